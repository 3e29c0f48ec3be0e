use serde::{Deserialize, Serialize};

/// Stored eligibility requirements for a single scheme.
///
/// Persisted as `{"rules": [{"field": .., "operator": .., "value": ..}]}`. Rules are kept exactly
/// as written; nothing is validated until evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Criteria {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self, MalformedCriteria> {
        Ok(Self::deserialize(value)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, MalformedCriteria> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "rules": self.rules })
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One `(field, operator, value)` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub field: String,
    pub operator: String,
    pub value: RuleValue,
}

impl Rule {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: RuleValue) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value,
        }
    }
}

/// Scalar literal written on a rule. The stored representation is kept verbatim so
/// re-serialising a document reproduces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl RuleValue {
    /// Whole-number view of a numeric literal, truncating any fraction toward zero.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RuleValue::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.is_finite())
                    .map(|value| value.trunc() as i64)
            }),
            RuleValue::Bool(_) | RuleValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleValue::Text(text) => Some(text.as_str()),
            RuleValue::Bool(_) | RuleValue::Number(_) => None,
        }
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        RuleValue::Number(value.into())
    }
}

impl From<i32> for RuleValue {
    fn from(value: i32) -> Self {
        RuleValue::Number(value.into())
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Bool(value)
    }
}

/// A stored criteria document that does not have the expected shape.
#[derive(Debug, thiserror::Error)]
#[error("malformed criteria document: {0}")]
pub struct MalformedCriteria(#[from] serde_json::Error);
