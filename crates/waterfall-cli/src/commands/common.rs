use log::info;
use std::path::Path;
use waterfall_core::{parse_request, FundTerms, ParsedRequest};

use crate::print_info;

/// Shared request loader used by `calculate`, `carry` and `rounds`.
/// Reads the JSON request and, when a terms file is given, swaps its tiers
/// for the validated terms template.
pub fn load_request(
    request_path: &Path,
    terms_path: Option<&Path>,
) -> Result<ParsedRequest, Box<dyn std::error::Error>> {
    if !request_path.exists() {
        return Err(format!("Request file not found: {}", request_path.display()).into());
    }
    let data = std::fs::read_to_string(request_path)?;
    let mut parsed = parse_request(&data)
        .map_err(|e| format!("{}: {}", request_path.display(), e))?;

    if let Some(path) = terms_path {
        let terms = FundTerms::load_from_file(path)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        terms.validate()?;
        info!("Applying terms '{}' from {}", terms.name, path.display());
        parsed.request = parsed.request.with_terms(&terms);
    }

    Ok(parsed)
}

/// Report tiers the parser dropped.
pub fn report_skipped(parsed: &ParsedRequest) {
    for tier in &parsed.skipped {
        print_info(&format!(
            "Skipped tier {} '{}': {}",
            tier.order, tier.kind, tier.reason
        ));
    }
}
