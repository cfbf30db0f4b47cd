// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Rule severity policy.
//!
//! | Rule                              | strict  | lenient |
//! |-----------------------------------|---------|---------|
//! | reference_type_invalid_reference  | Error   | Warning |
//! | reference_type_property_not_variable | Error | Warning |
//! | reference_target_unreadable       | Warning | Warning |
//! | type_definition_cardinality       | Error   | Warning |
//! | modelling_rule_cardinality        | Error   | Warning |
//! | view_invalid_reference            | Error   | Warning |
//! | data_type_invalid_reference       | Error   | Error   |
//! | data_type_definition_missing      | Warning | Info    |
//! | data_type_definition_mismatch     | Error   | Error   |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diagnostic::{Rule, Severity};
use crate::error::ValidatorError;

// =============================================================================
// Profile
// =============================================================================

/// Named severity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Every cardinality and reference violation fails the node.
    #[default]
    Strict,
    /// Only DataType violations fail the node.
    Lenient,
}

impl Profile {
    /// Returns the profile name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ValidatorError::invalid_policy(format!(
                "unknown profile '{}' (expected strict or lenient)",
                s
            ))),
        }
    }
}

// =============================================================================
// RulePolicy
// =============================================================================

/// Maps each [`Rule`] to the [`Severity`] it is reported with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePolicy {
    profile: Profile,
    severities: HashMap<Rule, Severity>,
}

impl RulePolicy {
    /// Creates the policy for a profile.
    pub fn from_profile(profile: Profile) -> Self {
        let severities = Rule::MODEL_RULES
            .iter()
            .map(|rule| (*rule, Self::profile_severity(profile, *rule)))
            .collect();
        Self {
            profile,
            severities,
        }
    }

    /// The strict profile.
    pub fn strict() -> Self {
        Self::from_profile(Profile::Strict)
    }

    /// The lenient profile.
    pub fn lenient() -> Self {
        Self::from_profile(Profile::Lenient)
    }

    fn profile_severity(profile: Profile, rule: Rule) -> Severity {
        use Rule::*;
        match (profile, rule) {
            (_, ReferenceTargetUnreadable) => Severity::Warning,
            (_, DataTypeInvalidReference | DataTypeDefinitionMismatch) => Severity::Error,
            (Profile::Strict, DataTypeDefinitionMissing) => Severity::Warning,
            (Profile::Lenient, DataTypeDefinitionMissing) => Severity::Info,
            (Profile::Strict, _) => Severity::Error,
            (Profile::Lenient, _) => Severity::Warning,
        }
    }

    /// Overrides the severity of one rule.
    ///
    /// Faults cannot be overridden and always report as [`Severity::Error`].
    pub fn with_override(mut self, rule: Rule, severity: Severity) -> Result<Self, ValidatorError> {
        if rule.is_fault() {
            return Err(ValidatorError::invalid_policy(format!(
                "rule '{}' is a fault and cannot be overridden",
                rule
            )));
        }
        self.severities.insert(rule, severity);
        Ok(self)
    }

    /// Applies overrides given as `rule -> severity` strings.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Result<Self, ValidatorError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (rule, severity) in overrides {
            self = self.with_override(rule.parse()?, severity.parse()?)?;
        }
        Ok(self)
    }

    /// Returns the profile the policy was built from.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Returns the effective severity of a rule.
    pub fn severity_of(&self, rule: Rule) -> Severity {
        if rule.is_fault() {
            return Severity::Error;
        }
        self.severities
            .get(&rule)
            .copied()
            .unwrap_or_else(|| Self::profile_severity(self.profile, rule))
    }
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::strict()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_profile() {
        let policy = RulePolicy::strict();
        assert_eq!(policy.severity_of(Rule::TypeDefinitionCardinality), Severity::Error);
        assert_eq!(policy.severity_of(Rule::ReferenceTargetUnreadable), Severity::Warning);
        assert_eq!(policy.severity_of(Rule::DataTypeDefinitionMissing), Severity::Warning);
        assert_eq!(policy.profile(), Profile::Strict);
    }

    #[test]
    fn test_lenient_profile() {
        let policy = RulePolicy::lenient();
        assert_eq!(policy.severity_of(Rule::TypeDefinitionCardinality), Severity::Warning);
        assert_eq!(policy.severity_of(Rule::ViewInvalidReference), Severity::Warning);
        assert_eq!(policy.severity_of(Rule::DataTypeInvalidReference), Severity::Error);
        assert_eq!(policy.severity_of(Rule::DataTypeDefinitionMismatch), Severity::Error);
        assert_eq!(policy.severity_of(Rule::DataTypeDefinitionMissing), Severity::Info);
    }

    #[test]
    fn test_faults_are_always_errors() {
        let policy = RulePolicy::lenient();
        assert_eq!(policy.severity_of(Rule::AttributeUnreadable), Severity::Error);
        assert_eq!(policy.severity_of(Rule::NodeClassInvalid), Severity::Error);
        assert!(policy.with_override(Rule::BrowseFailed, Severity::Info).is_err());
    }

    #[test]
    fn test_override() {
        let policy = RulePolicy::strict()
            .with_override(Rule::ModellingRuleCardinality, Severity::Info)
            .unwrap();
        assert_eq!(policy.severity_of(Rule::ModellingRuleCardinality), Severity::Info);
        assert_eq!(policy.severity_of(Rule::TypeDefinitionCardinality), Severity::Error);
    }

    #[test]
    fn test_overrides_from_strings() {
        let mut overrides = HashMap::new();
        overrides.insert("view_invalid_reference".to_string(), "info".to_string());
        let policy = RulePolicy::strict().with_overrides(&overrides).unwrap();
        assert_eq!(policy.severity_of(Rule::ViewInvalidReference), Severity::Info);

        let mut bad = HashMap::new();
        bad.insert("view_invalid_reference".to_string(), "loud".to_string());
        assert!(RulePolicy::strict().with_overrides(&bad).is_err());
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("Lenient".parse::<Profile>().unwrap(), Profile::Lenient);
        assert!("relaxed".parse::<Profile>().is_err());
        assert_eq!(Profile::default(), Profile::Strict);
    }
}
