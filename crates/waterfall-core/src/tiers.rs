// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FUND WATERFALL - TIER PROCESSORS
//
// One pure function per tier kind. Each takes the remaining pool and the
// investor list and returns line items plus the amount consumed.
//
// Rounding: every per-investor share is rounded half-up to the cent on its
// own, then the signed residual against the tier target is pushed onto the
// first non-zero item in processing order. Who gets the extra cent is
// externally observable, so the order here is part of the contract.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::NaiveDate;

use crate::money::{mul_div_round, Bps, BPS_SCALE, DAYS_PER_YEAR};
use crate::types::{Investor, LineItem, TierKind};

/// What one tier handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierOutcome {
    pub items: Vec<LineItem>,
    pub consumed: u128,
}

impl TierOutcome {
    fn empty() -> Self {
        Self::default()
    }
}

// ─────────────────────────────────────────────────────────────────
// CAPITAL RETURN
// ─────────────────────────────────────────────────────────────────

/// Return unreturned capital pro-rata by need, capped at the pool.
pub fn capital_return(pool: u128, investors: &[Investor], order: i64) -> TierOutcome {
    let needs: Vec<(&Investor, u128)> = investors
        .iter()
        .map(|inv| (inv, inv.unreturned_capital()))
        .filter(|(_, need)| *need > 0)
        .collect();

    pay_needs(pool, &needs, TierKind::CapitalReturn, order)
}

// ─────────────────────────────────────────────────────────────────
// PREFERRED RETURN
// ─────────────────────────────────────────────────────────────────

/// Whole days from contribution to distribution, floored at zero.
pub fn accrual_days(contribution_date: NaiveDate, distribution_date: NaiveDate) -> u128 {
    let days = (distribution_date - contribution_date).num_days();
    days.max(0) as u128
}

/// Simple (non-compounding) preference accrued since contribution, actual/365,
/// rounded to the cent.
pub fn accrued_preference(investor: &Investor, rate: Bps, distribution_date: NaiveDate) -> u128 {
    let days = accrual_days(investor.contribution_date, distribution_date);
    mul_div_round(
        investor.called_amount,
        rate.as_u128() * days,
        BPS_SCALE as u128 * DAYS_PER_YEAR,
    )
}

/// Pay LPs their accrued preference not already paid in earlier rounds.
/// GP positions never receive preferred return.
pub fn preferred_return(
    pool: u128,
    investors: &[Investor],
    order: i64,
    rate: Bps,
    distribution_date: NaiveDate,
) -> TierOutcome {
    if rate.is_zero() {
        return TierOutcome::empty();
    }

    let needs: Vec<(&Investor, u128)> = investors
        .iter()
        .filter(|inv| !inv.is_gp)
        .map(|inv| {
            let accrued = accrued_preference(inv, rate, distribution_date);
            (inv, accrued.saturating_sub(inv.prior_preferred_return))
        })
        .filter(|(_, need)| *need > 0)
        .collect();

    pay_needs(pool, &needs, TierKind::PreferredReturn, order)
}

// ─────────────────────────────────────────────────────────────────
// CATCH-UP
// ─────────────────────────────────────────────────────────────────

/// Cumulative catch-up the GP should hold so that it equals `catch_up` of
/// the profit distributed: profits × pct / (1 − pct).
pub fn catch_up_target(profits_so_far: u128, catch_up: Bps) -> u128 {
    if catch_up.0 >= BPS_SCALE {
        return 0;
    }
    mul_div_round(
        profits_so_far,
        catch_up.as_u128(),
        (BPS_SCALE - catch_up.0) as u128,
    )
}

/// Bring GP catch-up up to its target share of profit paid so far this round.
/// The pooled need is split across GPs by called capital (evenly if none).
pub fn catch_up(
    pool: u128,
    investors: &[Investor],
    order: i64,
    catch_up: Bps,
    profits_so_far: u128,
) -> TierOutcome {
    let gps: Vec<&Investor> = investors.iter().filter(|inv| inv.is_gp).collect();
    if gps.is_empty() || catch_up.is_zero() || pool == 0 {
        return TierOutcome::empty();
    }

    let target = catch_up_target(profits_so_far, catch_up);
    let already_paid = gps
        .iter()
        .fold(0u128, |acc, inv| acc.saturating_add(inv.prior_catch_up));
    let need = target.saturating_sub(already_paid);
    if need == 0 {
        return TierOutcome::empty();
    }

    let amount = need.min(pool);
    let mut items = split_by_capital(amount, &gps, TierKind::CatchUp, order);
    reconcile(&mut items, amount);
    TierOutcome {
        items,
        consumed: amount,
    }
}

// ─────────────────────────────────────────────────────────────────
// PROFIT SPLIT
// ─────────────────────────────────────────────────────────────────

/// Split the remaining pool into a GP pool and an LP pool. A group with no
/// investors gets no pool; its share stays in the round's remainder rather
/// than being handed to the other group.
pub fn profit_split(
    pool: u128,
    investors: &[Investor],
    order: i64,
    gp_share: Bps,
    lp_share: Bps,
) -> TierOutcome {
    if pool == 0 {
        return TierOutcome::empty();
    }

    let gps: Vec<&Investor> = investors.iter().filter(|inv| inv.is_gp).collect();
    let lps: Vec<&Investor> = investors.iter().filter(|inv| !inv.is_gp).collect();

    let gp_pool = if gps.is_empty() {
        0
    } else {
        mul_div_round(pool, gp_share.as_u128(), BPS_SCALE as u128).min(pool)
    };
    let lp_pool = if lps.is_empty() {
        0
    } else {
        // Two half-up roundings can overshoot a 100% split by one cent
        mul_div_round(pool, lp_share.as_u128(), BPS_SCALE as u128).min(pool - gp_pool)
    };

    let declared = gp_pool + lp_pool;
    if declared == 0 {
        return TierOutcome::empty();
    }

    let mut items = split_by_capital(gp_pool, &gps, TierKind::ProfitSplit, order);
    items.extend(split_by_capital(lp_pool, &lps, TierKind::ProfitSplit, order));
    reconcile(&mut items, declared);
    TierOutcome {
        items,
        consumed: declared,
    }
}

// ─────────────────────────────────────────────────────────────────
// SHARED ALLOCATION + ROUNDING RECONCILIATION
// ─────────────────────────────────────────────────────────────────

/// Pay `min(pool, Σ need)` pro-rata by need.
fn pay_needs(pool: u128, needs: &[(&Investor, u128)], kind: TierKind, order: i64) -> TierOutcome {
    let total_need = needs
        .iter()
        .fold(0u128, |acc, (_, need)| acc.saturating_add(*need));
    if total_need == 0 || pool == 0 {
        return TierOutcome::empty();
    }

    let available = pool.min(total_need);
    let mut items: Vec<LineItem> = needs
        .iter()
        .map(|(inv, need)| {
            LineItem::new(inv, kind, order, mul_div_round(available, *need, total_need))
        })
        .collect();
    reconcile(&mut items, available);
    TierOutcome {
        items,
        consumed: available,
    }
}

/// Allocate `amount` across a group weighted by called capital, falling back
/// to an even split when the group holds no capital.
fn split_by_capital(amount: u128, group: &[&Investor], kind: TierKind, order: i64) -> Vec<LineItem> {
    if amount == 0 || group.is_empty() {
        return Vec::new();
    }
    let total_capital = group
        .iter()
        .fold(0u128, |acc, inv| acc.saturating_add(inv.called_amount));
    group
        .iter()
        .map(|inv| {
            let share = if total_capital == 0 {
                mul_div_round(amount, 1, group.len() as u128)
            } else {
                mul_div_round(amount, inv.called_amount, total_capital)
            };
            LineItem::new(inv, kind, order, share)
        })
        .collect()
}

/// Make the items sum to exactly `target`.
///
/// A shortfall goes to the first non-zero item (or the first item when all
/// are zero). An excess is taken from the first non-zero item, spilling to
/// the next one only if the first would go negative. Zero items are dropped.
pub fn reconcile(items: &mut Vec<LineItem>, target: u128) {
    let allocated = items
        .iter()
        .fold(0u128, |acc, item| acc.saturating_add(item.amount));

    if allocated < target {
        let shortfall = target - allocated;
        let idx = items.iter().position(|item| item.amount > 0).unwrap_or(0);
        if let Some(item) = items.get_mut(idx) {
            item.amount += shortfall;
        }
    } else if allocated > target {
        let mut excess = allocated - target;
        for item in items.iter_mut().filter(|item| item.amount > 0) {
            if excess == 0 {
                break;
            }
            let take = excess.min(item.amount);
            item.amount -= take;
            excess -= take;
        }
    }

    items.retain(|item| item.amount > 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOLLAR: u128 = 100;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lp(id: &str, called: u128) -> Investor {
        Investor::new(id, &format!("LP {}", id), false, called, date(2023, 1, 1))
    }

    fn gp(id: &str, called: u128) -> Investor {
        Investor::new(id, &format!("GP {}", id), true, called, date(2023, 1, 1))
    }

    fn sum(items: &[LineItem]) -> u128 {
        items.iter().map(|i| i.amount).sum()
    }

    // ── Capital return ──────────────────────────────────────────

    #[test]
    fn test_capital_return_full() {
        let investors = vec![lp("A", 500_000 * DOLLAR), lp("B", 500_000 * DOLLAR)];
        let out = capital_return(1_200_000 * DOLLAR, &investors, 1);
        assert_eq!(out.consumed, 1_000_000 * DOLLAR);
        assert_eq!(out.items.len(), 2);
        assert!(out.items.iter().all(|i| i.amount == 500_000 * DOLLAR));
    }

    #[test]
    fn test_capital_return_partial_pro_rata() {
        let investors = vec![lp("A", 300_000 * DOLLAR), lp("B", 100_000 * DOLLAR)];
        let out = capital_return(200_000 * DOLLAR, &investors, 1);
        assert_eq!(out.consumed, 200_000 * DOLLAR);
        assert_eq!(out.items[0].amount, 150_000 * DOLLAR);
        assert_eq!(out.items[1].amount, 50_000 * DOLLAR);
    }

    #[test]
    fn test_capital_return_respects_prior_rounds() {
        let mut a = lp("A", 500_000 * DOLLAR);
        a.prior_return_of_capital = 500_000 * DOLLAR;
        let b = lp("B", 500_000 * DOLLAR);
        let out = capital_return(1_000_000 * DOLLAR, &[a, b], 1);
        assert_eq!(out.consumed, 500_000 * DOLLAR);
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].investment_id, "B");
    }

    #[test]
    fn test_capital_return_degenerate() {
        assert_eq!(capital_return(1_000, &[], 1), TierOutcome::default());
        let investors = vec![lp("A", 1_000)];
        assert_eq!(capital_return(0, &investors, 1), TierOutcome::default());
    }

    #[test]
    fn test_capital_return_residual_goes_to_first() {
        // 100 cents over three equal needs: 33.33 each → 33 + 33 + 33, +1 to first
        let investors = vec![lp("A", 1_000), lp("B", 1_000), lp("C", 1_000)];
        let out = capital_return(100, &investors, 1);
        assert_eq!(out.consumed, 100);
        assert_eq!(out.items[0].amount, 34);
        assert_eq!(out.items[1].amount, 33);
        assert_eq!(out.items[2].amount, 33);
    }

    #[test]
    fn test_capital_return_overshoot_taken_from_first() {
        // 2 cents over four equal needs: 0.5 each rounds up to 1 → 4, excess 2
        let investors = vec![lp("A", 10), lp("B", 10), lp("C", 10), lp("D", 10)];
        let out = capital_return(2, &investors, 1);
        assert_eq!(out.consumed, 2);
        assert_eq!(sum(&out.items), 2);
        // A absorbs one cent and drops out, B absorbs the spill
        assert_eq!(out.items.len(), 2);
        assert_eq!(out.items[0].investment_id, "C");
        assert_eq!(out.items[1].investment_id, "D");
    }

    // ── Preferred return ────────────────────────────────────────

    #[test]
    fn test_accrual_days_floor_at_zero() {
        assert_eq!(accrual_days(date(2023, 1, 1), date(2024, 1, 1)), 365);
        assert_eq!(accrual_days(date(2024, 1, 1), date(2025, 1, 1)), 366);
        assert_eq!(accrual_days(date(2024, 6, 1), date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_accrued_preference_one_year() {
        let inv = lp("A", 500_000 * DOLLAR);
        assert_eq!(
            accrued_preference(&inv, Bps(800), date(2024, 1, 1)),
            40_000 * DOLLAR
        );
    }

    #[test]
    fn test_accrued_preference_partial_year_rounds_to_cent() {
        // 1000.00 × 8% × 100/365 = 21.9178... → 21.92
        let inv = lp("A", 1_000 * DOLLAR);
        assert_eq!(accrued_preference(&inv, Bps(800), date(2023, 4, 11)), 2_192);
    }

    #[test]
    fn test_preferred_return_excludes_gp() {
        let investors = vec![gp("G", 100_000 * DOLLAR), lp("L", 900_000 * DOLLAR)];
        let out = preferred_return(1_000_000 * DOLLAR, &investors, 2, Bps(800), date(2024, 1, 1));
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].investment_id, "L");
        assert_eq!(out.consumed, 72_000 * DOLLAR);
    }

    #[test]
    fn test_preferred_return_nets_prior_payments() {
        let mut a = lp("A", 500_000 * DOLLAR);
        a.prior_preferred_return = 30_000 * DOLLAR;
        let out = preferred_return(1_000_000 * DOLLAR, &[a], 2, Bps(800), date(2024, 1, 1));
        assert_eq!(out.consumed, 10_000 * DOLLAR);
    }

    #[test]
    fn test_preferred_return_before_contribution_pays_nothing() {
        let investors = vec![lp("A", 500_000 * DOLLAR)];
        let out = preferred_return(1_000 * DOLLAR, &investors, 2, Bps(800), date(2022, 6, 1));
        assert_eq!(out, TierOutcome::default());
    }

    // ── Catch-up ────────────────────────────────────────────────

    #[test]
    fn test_catch_up_target_formula() {
        // 72,000 × 0.2 / 0.8 = 18,000
        assert_eq!(catch_up_target(72_000 * DOLLAR, Bps(2000)), 18_000 * DOLLAR);
        assert_eq!(catch_up_target(72_000 * DOLLAR, Bps::WHOLE), 0);
    }

    #[test]
    fn test_catch_up_pays_gp() {
        let investors = vec![gp("G", 100_000 * DOLLAR), lp("L", 900_000 * DOLLAR)];
        let out = catch_up(500_000 * DOLLAR, &investors, 3, Bps(2000), 72_000 * DOLLAR);
        assert_eq!(out.consumed, 18_000 * DOLLAR);
        assert_eq!(out.items.len(), 1);
        assert!(out.items[0].is_gp);
    }

    #[test]
    fn test_catch_up_no_gp_or_zero_pct() {
        let lps = vec![lp("L", 900_000 * DOLLAR)];
        assert_eq!(
            catch_up(500_000 * DOLLAR, &lps, 3, Bps(2000), 72_000 * DOLLAR),
            TierOutcome::default()
        );
        let gps = vec![gp("G", 100_000 * DOLLAR)];
        assert_eq!(
            catch_up(500_000 * DOLLAR, &gps, 3, Bps::ZERO, 72_000 * DOLLAR),
            TierOutcome::default()
        );
    }

    #[test]
    fn test_catch_up_nets_prior_and_caps_at_pool() {
        let mut g = gp("G", 100_000 * DOLLAR);
        g.prior_catch_up = 8_000 * DOLLAR;
        let out = catch_up(500_000 * DOLLAR, &[g.clone()], 3, Bps(2000), 72_000 * DOLLAR);
        assert_eq!(out.consumed, 10_000 * DOLLAR);

        let out = catch_up(4_000 * DOLLAR, &[g], 3, Bps(2000), 72_000 * DOLLAR);
        assert_eq!(out.consumed, 4_000 * DOLLAR);
    }

    #[test]
    fn test_catch_up_weighted_by_capital_with_even_fallback() {
        let investors = vec![gp("G1", 300 * DOLLAR), gp("G2", 100 * DOLLAR)];
        let out = catch_up(1_000 * DOLLAR, &investors, 3, Bps(5000), 400 * DOLLAR);
        assert_eq!(out.items[0].amount, 300 * DOLLAR);
        assert_eq!(out.items[1].amount, 100 * DOLLAR);

        let investors = vec![gp("G1", 0), gp("G2", 0)];
        let out = catch_up(1_000 * DOLLAR, &investors, 3, Bps(5000), 401);
        // target 401 cents split evenly: 201 (200.5 rounds up) + 201, overshoot 1 off the first
        assert_eq!(out.consumed, 401);
        assert_eq!(out.items[0].amount, 200);
        assert_eq!(out.items[1].amount, 201);
    }

    // ── Profit split ────────────────────────────────────────────

    #[test]
    fn test_profit_split_both_groups() {
        let investors = vec![gp("G", 100_000 * DOLLAR), lp("L", 900_000 * DOLLAR)];
        let out = profit_split(410_000 * DOLLAR, &investors, 4, Bps(2000), Bps(8000));
        assert_eq!(out.consumed, 410_000 * DOLLAR);
        assert_eq!(out.items[0].amount, 82_000 * DOLLAR);
        assert_eq!(out.items[1].amount, 328_000 * DOLLAR);
    }

    #[test]
    fn test_profit_split_unclaimed_gp_pool_left_in_remainder() {
        let investors = vec![lp("A", 500_000 * DOLLAR), lp("B", 500_000 * DOLLAR)];
        let out = profit_split(120_000 * DOLLAR, &investors, 4, Bps(2000), Bps(8000));
        assert_eq!(out.consumed, 96_000 * DOLLAR);
        assert_eq!(sum(&out.items), 96_000 * DOLLAR);
        assert!(out.items.iter().all(|i| i.amount == 48_000 * DOLLAR));
    }

    #[test]
    fn test_profit_split_never_exceeds_pool() {
        // 1 cent at 50/50: both pools would round up to 1
        let investors = vec![gp("G", 10), lp("L", 10)];
        let out = profit_split(1, &investors, 4, Bps(5000), Bps(5000));
        assert_eq!(out.consumed, 1);
        assert_eq!(sum(&out.items), 1);
    }

    #[test]
    fn test_profit_split_gp_share_above_whole_capped_at_pool() {
        let investors = vec![gp("G", 10), lp("L", 10)];
        let out = profit_split(1_000 * DOLLAR, &investors, 4, Bps(15_000), Bps(0));
        assert_eq!(out.consumed, 1_000 * DOLLAR);
        assert_eq!(sum(&out.items), 1_000 * DOLLAR);
        assert_eq!(out.items.len(), 1);
        assert!(out.items[0].is_gp);
    }

    #[test]
    fn test_profit_split_partial_shares_leave_remainder() {
        let investors = vec![gp("G", 10), lp("L", 10)];
        let out = profit_split(1_000 * DOLLAR, &investors, 4, Bps(1000), Bps(5000));
        assert_eq!(out.consumed, 600 * DOLLAR);
    }

    // ── Reconcile ───────────────────────────────────────────────

    #[test]
    fn test_reconcile_all_zero_gives_first_item() {
        let inv = lp("A", 1);
        let mut items = vec![
            LineItem::new(&inv, TierKind::CapitalReturn, 1, 0),
            LineItem::new(&inv, TierKind::CapitalReturn, 1, 0),
        ];
        reconcile(&mut items, 1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, 1);
    }
}
