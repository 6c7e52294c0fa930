//! # Action Names
//!
//! Newtype wrapper for action identifiers. An [`ActionName`] can only be
//! built through a name rule, so holding one proves the name was checked.
//!
//! The default rule is [`ACTION_NAME_PATTERN`]: lowercase ASCII letters and
//! digits, with single hyphens between runs. Leading, trailing, and doubled
//! hyphens are rejected, as is any uppercase letter. Deployments that need a
//! different rule supply their own pattern through [`ActionNameRule::new`].

use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// Default action name rule.
pub const ACTION_NAME_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

static DEFAULT_RULE: LazyLock<ActionNameRule> = LazyLock::new(|| ActionNameRule {
    pattern: Regex::new(ACTION_NAME_PATTERN).expect("default action name pattern compiles"),
});

/// A compiled action name rule.
#[derive(Debug, Clone)]
pub struct ActionNameRule {
    pattern: Regex,
}

impl ActionNameRule {
    /// Compile a custom name rule.
    ///
    /// Patterns should be anchored (`^...$`); an unanchored pattern accepts
    /// any name that merely contains a match.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// The process-wide default rule, compiled once on first use.
    pub fn default_rule() -> &'static ActionNameRule {
        &DEFAULT_RULE
    }

    /// The source text of the rule.
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether `name` satisfies the rule.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    /// Validate `name` and wrap it.
    pub fn parse(&self, name: &str) -> Result<ActionName, IdentityError> {
        if self.matches(name) {
            Ok(ActionName(name.to_string()))
        } else {
            Err(IdentityError::BadActionName(name.to_string()))
        }
    }
}

/// Validated name of an action, e.g. `snapshot` or `remote-sync`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionName(String);

impl ActionName {
    /// Validate `name` against the default rule.
    pub fn new(name: &str) -> Result<Self, IdentityError> {
        ActionNameRule::default_rule().parse(name)
    }

    /// Access the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ActionName {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ActionName> for String {
    fn from(name: ActionName) -> Self {
        name.0
    }
}

impl Borrow<str> for ActionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ActionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_and_hyphenated_names() {
        for name in ["snapshot", "remote-sync", "a", "backup2", "do-re-mi", "2fa-reset"] {
            assert!(ActionName::new(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn test_rejects_malformed_names() {
        for name in ["-snapshot", "snapshot-", "Snapshot", "snap--shot", "snap_shot", "", "snap shot"] {
            let err = ActionName::new(name).unwrap_err();
            assert_eq!(err.to_string(), format!("bad action name {name}"));
        }
    }

    #[test]
    fn test_custom_rule_allows_double_hyphen() {
        let rule = ActionNameRule::new(r"^[a-z](?:[a-z-]*[a-z])?$").unwrap();
        assert!(rule.parse("snap--shot").is_ok());
        assert!(rule.parse("backup2").is_err());
    }

    #[test]
    fn test_invalid_custom_rule() {
        assert!(ActionNameRule::new("^[a-z").is_err());
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let name: ActionName = serde_json::from_str(r#""remote-sync""#).unwrap();
        assert_eq!(name.as_str(), "remote-sync");
        assert_eq!(serde_json::to_string(&name).unwrap(), r#""remote-sync""#);
        assert!(serde_json::from_str::<ActionName>(r#""Remote""#).is_err());
    }

    #[test]
    fn test_borrow_as_str_for_map_lookup() {
        let mut names = std::collections::BTreeMap::new();
        names.insert(ActionName::new("snapshot").unwrap(), 1);
        assert_eq!(names.get("snapshot"), Some(&1));
    }
}
