use crate::infra::InMemoryStore;
use chrono::{Local, NaiveDate};
use clap::Args;
use scheme_eligibility::eligibility::{
    EligibilityService, RuleCheck, RuleValue, Scheme, SchemeExplanation,
};
use scheme_eligibility::error::AppError;
use scheme_eligibility::seed::SeedData;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EligibleArgs {
    /// JSON seed file with applicants and schemes
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// Applicant identifier to evaluate
    #[arg(long)]
    pub(crate) applicant: String,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print per-rule verdicts for every scheme in the seed
    #[arg(long)]
    pub(crate) explain: bool,
}

pub(crate) fn run_eligibility_report(args: EligibleArgs) -> Result<(), AppError> {
    let EligibleArgs {
        seed,
        applicant,
        as_of,
        explain,
    } = args;

    let today = as_of.unwrap_or_else(|| Local::now().date_naive());
    let seed = SeedData::from_path(seed)?;
    let scheme_ids: Vec<String> = seed
        .schemes
        .iter()
        .map(|scheme| scheme.id.to_string())
        .collect();

    let store = Arc::new(InMemoryStore::from_seed(seed));
    let service = EligibilityService::new(store.clone(), store);
    let eligible = service.find_eligible_schemes(&applicant, today)?;

    println!("Eligible schemes for {} as of {}", applicant, today);
    print!("{}", render_schemes(&eligible));

    if explain {
        println!("\nRule verdicts");
        for scheme_id in &scheme_ids {
            let explanation = service.explain(&applicant, scheme_id, today)?;
            print!("{}", render_explanation(&explanation));
        }
    }

    Ok(())
}

fn render_schemes(schemes: &[Scheme]) -> String {
    if schemes.is_empty() {
        return "  none\n".to_string();
    }

    schemes
        .iter()
        .map(|scheme| format!("  - {} ({})\n", scheme.name, scheme.id))
        .collect()
}

fn render_explanation(explanation: &SchemeExplanation) -> String {
    let outcome = if explanation.eligible {
        "eligible"
    } else {
        "not eligible"
    };
    let mut out = format!("  {}: {}\n", explanation.scheme_name, outcome);

    if let Some(error) = &explanation.criteria_error {
        out.push_str(&format!("    criteria unreadable: {}\n", error));
    }
    for check in &explanation.rules {
        out.push_str(&render_check(check));
    }
    out
}

fn render_check(check: &RuleCheck) -> String {
    format!(
        "    {} {} {} -> {}\n",
        check.field,
        check.operator,
        render_value(&check.value),
        check.verdict.label()
    )
}

fn render_value(value: &RuleValue) -> String {
    match value {
        RuleValue::Text(text) => format!("\"{}\"", text),
        RuleValue::Number(number) => number.to_string(),
        RuleValue::Bool(flag) => flag.to_string(),
    }
}
