use chrono::NaiveDate;
use serde_json::json;

use super::common::*;
use crate::eligibility::{Criteria, EligibilityEvaluator, Rule, RuleValue, RuleVerdict};

fn criteria(document: serde_json::Value) -> Criteria {
    Criteria::from_value(&document).expect("criteria parses")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn empty_criteria_admits_everyone() {
    let evaluator = EligibilityEvaluator::new();

    assert!(evaluator.is_eligible(&applicant(), &Criteria::default(), today()));
    assert!(evaluator.is_eligible(
        &unemployed_applicant(date(2020, 1, 1)),
        &Criteria::default(),
        today()
    ));
}

#[test]
fn income_ceiling_admits_low_earners() {
    let evaluator = EligibilityEvaluator::new();
    let rules = criteria(json!({ "rules": [{ "field": "income", "operator": "<=", "value": 20000 }] }));

    assert!(evaluator.is_eligible(&applicant(), &rules, today()));
}

#[test]
fn income_ceiling_rejects_high_earners() {
    let evaluator = EligibilityEvaluator::new();
    let rules = criteria(json!({ "rules": [{ "field": "income", "operator": "<=", "value": 20000 }] }));
    let wealthy = crate::eligibility::Applicant {
        income: 50_000,
        ..applicant()
    };

    assert!(!evaluator.is_eligible(&wealthy, &rules, today()));
}

#[test]
fn every_rule_must_pass() {
    let evaluator = EligibilityEvaluator::new();
    let rules = criteria(json!({ "rules": [
        { "field": "income", "operator": "<=", "value": 20000 },
        { "field": "employment_status", "operator": "==", "value": "unemployed" }
    ] }));

    assert!(!evaluator.is_eligible(&applicant(), &rules, today()));

    let checks = evaluator.explain(&applicant(), &rules, today());
    assert_eq!(checks.len(), 2);
    assert_eq!(checks[0].verdict, RuleVerdict::Passed);
    assert_eq!(checks[1].verdict, RuleVerdict::Failed);
}

#[test]
fn unknown_fields_never_pass() {
    let evaluator = EligibilityEvaluator::new();

    for operator in ["==", "!=", ">=", "<=", ">", "<"] {
        let rule = Rule::new("household_size", operator, RuleValue::from(3));
        assert!(!evaluator.evaluate_rule(&applicant(), &rule, today()));
        assert_eq!(
            evaluator.verdict(&applicant(), &rule, today()),
            RuleVerdict::UnknownField
        );
    }
}

#[test]
fn unknown_operators_never_pass() {
    let evaluator = EligibilityEvaluator::new();
    let rule = Rule::new("income", "=<", RuleValue::from(20_000));

    assert_eq!(
        evaluator.verdict(&applicant(), &rule, today()),
        RuleVerdict::UnknownOperator
    );
}

#[test]
fn string_equality_is_exact_and_case_sensitive() {
    let evaluator = EligibilityEvaluator::new();
    let matching = Rule::new("marital_status", "==", RuleValue::from("married"));
    let shouting = Rule::new("marital_status", "==", RuleValue::from("MARRIED"));
    let padded = Rule::new("marital_status", "==", RuleValue::from("married "));
    let differs = Rule::new("disability_status", "!=", RuleValue::from("visual"));

    assert!(evaluator.evaluate_rule(&applicant(), &matching, today()));
    assert!(!evaluator.evaluate_rule(&applicant(), &shouting, today()));
    assert!(!evaluator.evaluate_rule(&applicant(), &padded, today()));
    assert!(evaluator.evaluate_rule(&applicant(), &differs, today()));
}

#[test]
fn string_fields_reject_ordering_operators() {
    let evaluator = EligibilityEvaluator::new();
    let rule = Rule::new("employment_status", ">", RuleValue::from("a"));

    assert_eq!(
        evaluator.verdict(&applicant(), &rule, today()),
        RuleVerdict::UnsupportedOperator
    );
}

#[test]
fn string_literal_against_integer_field_fails() {
    let evaluator = EligibilityEvaluator::new();
    let rule = Rule::new("income", "<=", RuleValue::from("20000"));

    assert_eq!(
        evaluator.verdict(&applicant(), &rule, today()),
        RuleVerdict::IncompatibleValue
    );
}

#[test]
fn not_equal_is_supported_on_integer_fields() {
    let evaluator = EligibilityEvaluator::new();
    let rule = Rule::new("number_of_children", "!=", RuleValue::from(0));

    assert!(evaluator.evaluate_rule(&applicant(), &rule, today()));
}

#[test]
fn age_is_derived_from_date_of_birth() {
    let evaluator = EligibilityEvaluator::new();
    let seniors = criteria(json!({ "rules": [{ "field": "age", "operator": ">=", "value": 40 }] }));

    // Born 1984-03-02.
    assert!(evaluator.is_eligible(&applicant(), &seniors, date(2024, 3, 2)));
    assert!(!evaluator.is_eligible(&applicant(), &seniors, date(2024, 3, 1)));
}

#[test]
fn months_unemployed_counts_whole_months() {
    let evaluator = EligibilityEvaluator::new();
    let long_term = criteria(json!({ "rules": [{ "field": "last_employed", "operator": ">=", "value": 6 }] }));
    let jobseeker = unemployed_applicant(date(2023, 12, 20));

    assert!(!evaluator.is_eligible(&jobseeker, &long_term, date(2024, 6, 19)));
    assert!(evaluator.is_eligible(&jobseeker, &long_term, date(2024, 6, 20)));
}

#[test]
fn last_employed_honours_the_written_operator() {
    let evaluator = EligibilityEvaluator::new();
    let recent = criteria(json!({ "rules": [{ "field": "last_employed", "operator": "<", "value": 3 }] }));

    assert!(evaluator.is_eligible(&unemployed_applicant(date(2024, 5, 1)), &recent, today()));
    assert!(!evaluator.is_eligible(&unemployed_applicant(date(2023, 5, 1)), &recent, today()));
}

#[test]
fn missing_last_employed_fails_the_rule() {
    let evaluator = EligibilityEvaluator::new();
    let rule = Rule::new("last_employed", ">=", RuleValue::from(0));

    assert_eq!(
        evaluator.verdict(&applicant(), &rule, today()),
        RuleVerdict::MissingValue
    );
}

#[test]
fn evaluation_is_repeatable_for_a_fixed_date() {
    let evaluator = EligibilityEvaluator::new();
    let rules = criteria(json!({ "rules": [
        { "field": "age", "operator": "<", "value": 65 },
        { "field": "number_of_children", "operator": ">", "value": 1 }
    ] }));

    let first = evaluator.is_eligible(&applicant(), &rules, today());
    let second = evaluator.is_eligible(&applicant(), &rules, today());
    assert!(first);
    assert_eq!(first, second);
    assert_eq!(
        evaluator.explain(&applicant(), &rules, today()),
        evaluator.explain(&applicant(), &rules, today())
    );
}
