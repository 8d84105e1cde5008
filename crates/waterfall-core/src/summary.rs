// Per-investor roll-up of a round's line items.

use std::collections::BTreeMap;

use crate::types::{Investor, InvestorSummary, LineItem};

/// Fold line items into one summary per investment id.
///
/// Every requested investor gets a row, in request order, even with no
/// line items. Repeated ids collapse into the first row carrying that id.
/// Items for ids not in the request are ignored.
pub fn summarize(investors: &[Investor], line_items: &[LineItem]) -> Vec<InvestorSummary> {
    let mut rows: Vec<InvestorSummary> = Vec::with_capacity(investors.len());
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for investor in investors {
        if !index.contains_key(investor.investment_id.as_str()) {
            index.insert(investor.investment_id.as_str(), rows.len());
            rows.push(InvestorSummary::zeroed(investor));
        }
    }

    for item in line_items {
        if let Some(&idx) = index.get(item.investment_id.as_str()) {
            let row = &mut rows[idx];
            *row.subtotal_mut(item.tier_kind) += item.amount;
            row.total += item.amount;
        }
    }

    rows
}
