mod fields;
mod operators;

pub use fields::{age_on, months_between, resolve, FieldKind, ResolvedValue};
pub use operators::Operator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::criteria::{Criteria, Rule, RuleValue};
use super::domain::Applicant;

/// Stateless evaluator deciding whether an applicant satisfies a scheme's criteria.
///
/// Evaluation never fails: a rule that names an unknown field or operator, or whose literal
/// cannot be compared with the applicant's value, simply does not pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityEvaluator;

impl EligibilityEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Every rule must pass; an empty criteria document admits everyone.
    pub fn is_eligible(&self, applicant: &Applicant, criteria: &Criteria, today: NaiveDate) -> bool {
        criteria.rules().all(|rule| {
            let verdict = self.verdict(applicant, rule, today);
            if !verdict.is_pass() {
                debug!(
                    applicant = %applicant.id,
                    field = %rule.field,
                    operator = %rule.operator,
                    verdict = verdict.label(),
                    "rule rejected applicant"
                );
            }
            verdict.is_pass()
        })
    }

    pub fn evaluate_rule(&self, applicant: &Applicant, rule: &Rule, today: NaiveDate) -> bool {
        self.verdict(applicant, rule, today).is_pass()
    }

    /// Classifies a single rule outcome, including why it did not pass.
    pub fn verdict(&self, applicant: &Applicant, rule: &Rule, today: NaiveDate) -> RuleVerdict {
        let Some(field) = FieldKind::parse(&rule.field) else {
            return RuleVerdict::UnknownField;
        };
        let Some(operator) = Operator::parse(&rule.operator) else {
            return RuleVerdict::UnknownOperator;
        };
        let Some(resolved) = resolve(field, applicant, today) else {
            return RuleVerdict::MissingValue;
        };

        operators::apply(resolved, operator, &rule.value)
    }

    /// Per-rule audit trail in document order. Unlike [`Self::is_eligible`] this does not stop
    /// at the first failing rule.
    pub fn explain(&self, applicant: &Applicant, criteria: &Criteria, today: NaiveDate) -> Vec<RuleCheck> {
        criteria
            .rules()
            .map(|rule| RuleCheck {
                field: rule.field.clone(),
                operator: rule.operator.clone(),
                value: rule.value.clone(),
                verdict: self.verdict(applicant, rule, today),
            })
            .collect()
    }
}

/// Result of checking one rule against one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVerdict {
    Passed,
    Failed,
    UnknownField,
    UnknownOperator,
    /// The operator exists but has no meaning for the field's type (e.g. `>` on text).
    UnsupportedOperator,
    /// The applicant has no value for the field, such as a null `last_employed`.
    MissingValue,
    /// The rule literal cannot be coerced to the field's type.
    IncompatibleValue,
}

impl RuleVerdict {
    pub(crate) fn from_outcome(passed: bool) -> Self {
        if passed {
            RuleVerdict::Passed
        } else {
            RuleVerdict::Failed
        }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, RuleVerdict::Passed)
    }

    pub const fn label(self) -> &'static str {
        match self {
            RuleVerdict::Passed => "passed",
            RuleVerdict::Failed => "failed",
            RuleVerdict::UnknownField => "unknown_field",
            RuleVerdict::UnknownOperator => "unknown_operator",
            RuleVerdict::UnsupportedOperator => "unsupported_operator",
            RuleVerdict::MissingValue => "missing_value",
            RuleVerdict::IncompatibleValue => "incompatible_value",
        }
    }
}

/// One line of an eligibility explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCheck {
    pub field: String,
    pub operator: String,
    pub value: RuleValue,
    pub verdict: RuleVerdict,
}
