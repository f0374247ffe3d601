//! Validation rules for text input

use regex::Regex;
use serde_yaml::Value as YamlValue;
use std::fmt;
use thiserror::Error;

/// Rejection of the current input buffer
///
/// Widget-local: shown inline and re-prompted, never returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("input cannot be empty")]
    Empty,

    #[error("input doesn't match the required pattern")]
    NoMatch,
}

/// One validation rule
#[derive(Clone)]
pub enum Rule {
    /// Reject empty or whitespace-only input
    Required,
    /// Reject input the pattern does not match
    Match(Regex),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "Required"),
            Rule::Match(re) => write!(f, "Match({})", re.as_str()),
        }
    }
}

impl Rule {
    /// Build a rule from a manifest entry such as `required: true` or
    /// `match: "^[a-z]+$"`
    ///
    /// `Ok(None)` means the entry is valid but adds no check (unknown names,
    /// `required: false`).
    pub fn from_entry(name: &str, arg: &YamlValue) -> Result<Option<Self>, String> {
        match name.trim().to_lowercase().as_str() {
            "required" => match arg.as_bool() {
                Some(true) => Ok(Some(Rule::Required)),
                Some(false) => Ok(None),
                None => Err("invalid argument: boolean expected".to_string()),
            },
            "match" => {
                let pattern = arg
                    .as_str()
                    .ok_or_else(|| "invalid argument: string expected".to_string())?;
                let re = Regex::new(pattern).map_err(|e| format!("invalid pattern: '{}'", e))?;
                Ok(Some(Rule::Match(re)))
            }
            _ => Ok(None),
        }
    }

    fn check(&self, raw: &str) -> Result<(), ValidationError> {
        match self {
            Rule::Required if raw.trim().is_empty() => Err(ValidationError::Empty),
            Rule::Match(re) if !re.is_match(raw) => Err(ValidationError::NoMatch),
            _ => Ok(()),
        }
    }
}

/// Ordered chain of rules; the first failing rule stops the chain
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Vec<Rule>,
}

impl Validator {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn required() -> Self {
        Self::new(vec![Rule::Required])
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn validate(&self, raw: &str) -> Result<(), ValidationError> {
        self.rules.iter().try_for_each(|rule| rule.check(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let v = Validator::required();
        assert_eq!(v.validate(""), Err(ValidationError::Empty));
        assert_eq!(v.validate("   "), Err(ValidationError::Empty));
        assert_eq!(v.validate("abc"), Ok(()));
    }

    #[test]
    fn test_first_failure_wins() {
        let v = Validator::new(vec![
            Rule::Required,
            Rule::Match(Regex::new("^[A-Z]").unwrap()),
        ]);
        assert_eq!(v.validate(""), Err(ValidationError::Empty));
        assert_eq!(v.validate("widget"), Err(ValidationError::NoMatch));
        assert_eq!(v.validate("Widget"), Ok(()));
    }

    #[test]
    fn test_rule_from_entry() {
        let rule = Rule::from_entry("Required", &YamlValue::Bool(true)).unwrap();
        assert!(matches!(rule, Some(Rule::Required)));

        let off = Rule::from_entry("required", &YamlValue::Bool(false)).unwrap();
        assert!(off.is_none());

        let unknown = Rule::from_entry("maxLength", &YamlValue::Bool(true)).unwrap();
        assert!(unknown.is_none());

        assert!(Rule::from_entry("match", &YamlValue::Bool(true)).is_err());
        assert!(Rule::from_entry("match", &YamlValue::String("(".into())).is_err());
    }

    #[test]
    fn test_empty_validator_accepts_anything() {
        assert!(Validator::default().validate("").is_ok());
    }
}
