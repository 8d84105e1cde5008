use log::info;
use std::path::Path;
use waterfall_core::{carry_forward, DistributionResult};

use super::common::load_request;
use crate::print_success;

pub fn handle(
    request: &Path,
    result: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load_request(request, None)?;

    if !result.exists() {
        return Err(format!("Result file not found: {}", result.display()).into());
    }
    let data = std::fs::read_to_string(result)?;
    let round: DistributionResult = serde_json::from_str(&data)
        .map_err(|e| format!("Invalid result file {}: {}", result.display(), e))?;

    if round.distribution_date < parsed.request.distribution_date {
        return Err(format!(
            "Result dated {} predates request dated {}",
            round.distribution_date, parsed.request.distribution_date
        )
        .into());
    }

    let next = carry_forward(&parsed.request.investors, &round);
    info!(
        "Carried forward {} investors from round dated {}",
        next.len(),
        round.distribution_date
    );
    let json = serde_json::to_string_pretty(&next)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            print_success(&format!(
                "Next-round investors written to {}",
                path.display()
            ));
        }
        None => println!("{}", json),
    }
    Ok(())
}
