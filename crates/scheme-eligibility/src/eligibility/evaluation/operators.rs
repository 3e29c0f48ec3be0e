use super::super::criteria::RuleValue;
use super::fields::ResolvedValue;
use super::RuleVerdict;

/// Comparison operators accepted on a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Operator {
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            ">=" => Some(Operator::Ge),
            "<=" => Some(Operator::Le),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            _ => None,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Lt => "<",
        }
    }

    fn compare_integers(self, actual: i64, expected: i64) -> bool {
        match self {
            Operator::Eq => actual == expected,
            Operator::Ne => actual != expected,
            Operator::Ge => actual >= expected,
            Operator::Le => actual <= expected,
            Operator::Gt => actual > expected,
            Operator::Lt => actual < expected,
        }
    }

    /// Text has no ordering; only equality operators apply.
    fn compare_text(self, actual: &str, expected: &str) -> Option<bool> {
        match self {
            Operator::Eq => Some(actual == expected),
            Operator::Ne => Some(actual != expected),
            Operator::Ge | Operator::Le | Operator::Gt | Operator::Lt => None,
        }
    }
}

/// Compares a resolved applicant value with a rule literal, coercing the literal to the
/// value's type first.
pub(crate) fn apply(resolved: ResolvedValue<'_>, operator: Operator, literal: &RuleValue) -> RuleVerdict {
    match resolved {
        ResolvedValue::Integer(actual) => match literal.as_integer() {
            Some(expected) => RuleVerdict::from_outcome(operator.compare_integers(actual, expected)),
            None => RuleVerdict::IncompatibleValue,
        },
        ResolvedValue::Text(actual) => match literal.as_text() {
            Some(expected) => match operator.compare_text(actual, expected) {
                Some(outcome) => RuleVerdict::from_outcome(outcome),
                None => RuleVerdict::UnsupportedOperator,
            },
            None => RuleVerdict::IncompatibleValue,
        },
    }
}
