use colored::*;
use std::path::Path;
use waterfall_core::{Bps, FundTerms, TierParams};

use crate::{print_info, print_success, TermsCommands};

pub fn handle(action: TermsCommands) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TermsCommands::Init { file, name, force } => init(&file, name.as_deref(), force)?,
        TermsCommands::Show { file } => show(&file)?,
        TermsCommands::Validate { file } => validate(&file)?,
    }
    Ok(())
}

fn init(file: &Path, name: Option<&str>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if file.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            file.display()
        )
        .into());
    }

    let mut terms = FundTerms::load_from_env()?;
    if let Some(name) = name {
        terms.name = name.to_string();
    }
    terms.validate()?;
    terms.save_to_file(file)?;

    print_success(&format!("Terms '{}' written to {}", terms.name, file.display()));
    Ok(())
}

fn show(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let terms = FundTerms::load_from_file(file)?;

    println!("{} {}", "Fund:".bold(), terms.name.cyan());
    let mut tiers = terms.tiers.clone();
    tiers.sort_by_key(|t| t.order);
    for tier in &tiers {
        println!(
            "  {:>3}  {:<18} {}",
            tier.order,
            tier.kind().as_str(),
            describe(&tier.params)
        );
    }
    if tiers.is_empty() {
        print_info("No tiers defined");
    }
    Ok(())
}

fn validate(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let terms = FundTerms::load_from_file(file)?;
    terms.validate()?;
    print_success(&format!(
        "Terms '{}' are valid ({} tiers)",
        terms.name,
        terms.tiers.len()
    ));
    Ok(())
}

fn percent(rate: Bps) -> String {
    format!("{}.{:02}%", rate.0 / 100, rate.0 % 100)
}

fn describe(params: &TierParams) -> String {
    match params {
        TierParams::CapitalReturn => String::new(),
        TierParams::PreferredReturn { rate } => format!("rate {}", percent(*rate)),
        TierParams::CatchUp { catch_up } => format!("target {}", percent(*catch_up)),
        TierParams::ProfitSplit { gp_share, lp_share } => {
            format!("GP {} / LP {}", percent(*gp_share), percent(*lp_share))
        }
    }
}
