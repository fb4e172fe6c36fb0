use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::errors::HarnessError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum OperationKind {
    ListAll,
    Get,
    Create,
    Rename,
    AddHours,
    Delete,
    DeleteAll,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::ListAll => "list_all",
            OperationKind::Get => "get",
            OperationKind::Create => "create",
            OperationKind::Rename => "rename",
            OperationKind::AddHours => "add_hours",
            OperationKind::Delete => "delete",
            OperationKind::DeleteAll => "delete_all",
        };
        f.write_str(name)
    }
}

/// One directory operation together with the arguments it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    ListAll,
    Get { id: u32 },
    Create { name: String },
    Rename { id: u32, name: String },
    AddHours { id: u32, hours: i64 },
    Delete { id: u32 },
    DeleteAll,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::ListAll => OperationKind::ListAll,
            Operation::Get { .. } => OperationKind::Get,
            Operation::Create { .. } => OperationKind::Create,
            Operation::Rename { .. } => OperationKind::Rename,
            Operation::AddHours { .. } => OperationKind::AddHours,
            Operation::Delete { .. } => OperationKind::Delete,
            Operation::DeleteAll => OperationKind::DeleteAll,
        }
    }

    /// Builds an operation from loose arguments, failing with the name of the first missing one.
    pub fn from_parts(
        kind: OperationKind,
        id: Option<u32>,
        name: Option<String>,
        hours: Option<i64>,
    ) -> Result<Self, &'static str> {
        let require_id = || id.ok_or("missing id");
        Ok(match kind {
            OperationKind::ListAll => Operation::ListAll,
            OperationKind::Get => Operation::Get { id: require_id()? },
            OperationKind::Create => Operation::Create { name: name.ok_or("missing name")? },
            // An empty name is a legal rename: the record comes back unchanged
            OperationKind::Rename => Operation::Rename { id: require_id()?, name: name.unwrap_or_default() },
            OperationKind::AddHours => Operation::AddHours { id: require_id()?, hours: hours.ok_or("missing hours")? },
            OperationKind::Delete => Operation::Delete { id: require_id()? },
            OperationKind::DeleteAll => Operation::DeleteAll,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    Contains(String),
    Omits(String),
}

impl Expectation {
    /// Returns the failure message when `result` does not satisfy the expectation.
    pub fn check(&self, test_name: &str, result: &str) -> Option<String> {
        match self {
            Expectation::Contains(expected) if !result.contains(expected.as_str()) => Some(format!(
                "Failed test {}: Expected {} but got {}",
                test_name, expected, result
            )),
            Expectation::Omits(forbidden) if result.contains(forbidden.as_str()) => Some(format!(
                "Failed test {}: Not expecting {} but got {}",
                test_name, forbidden, result
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub operation: Operation,
    pub expectation: Expectation,
}

impl TestCase {
    pub fn expecting(name: &str, operation: Operation, expected: &str) -> Self {
        Self {
            name: name.to_string(),
            operation,
            expectation: Expectation::Contains(expected.to_string()),
        }
    }

    pub fn forbidding(name: &str, operation: Operation, forbidden: &str) -> Self {
        Self {
            name: name.to_string(),
            operation,
            expectation: Expectation::Omits(forbidden.to_string()),
        }
    }
}

/// A test case as written in configuration, before validation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TestCaseSpec {
    pub name: String,
    pub operation: OperationKind,
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub hours: Option<i64>,
    #[serde(default, alias = "expectedSubstring")]
    pub expected: Option<String>,
    #[serde(default, alias = "forbiddenSubstring")]
    pub forbidden: Option<String>,
}

impl TryFrom<TestCaseSpec> for TestCase {
    type Error = HarnessError;

    fn try_from(spec: TestCaseSpec) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| HarnessError::InvalidTestCase {
            name: spec.name.clone(),
            reason: reason.to_string(),
        };

        let expectation = match (&spec.expected, &spec.forbidden) {
            (Some(expected), None) if !expected.is_empty() => Expectation::Contains(expected.clone()),
            (None, Some(forbidden)) if !forbidden.is_empty() => Expectation::Omits(forbidden.clone()),
            (Some(_), Some(_)) => {
                return Err(invalid("provide either expected or forbidden, not both"))
            }
            _ => return Err(invalid("provide expected or forbidden")),
        };

        let operation = Operation::from_parts(spec.operation, spec.id, spec.user_name.clone(), spec.hours)
            .map_err(invalid)?;

        Ok(TestCase {
            name: spec.name,
            operation,
            expectation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(operation: OperationKind) -> TestCaseSpec {
        TestCaseSpec {
            name: "STEP".into(),
            operation,
            id: None,
            user_name: None,
            hours: None,
            expected: None,
            forbidden: None,
        }
    }

    #[test]
    fn test_expectation_check() {
        let contains = Expectation::Contains("Test User".into());
        assert_eq!(contains.check("ADD USER", r#"{"name": "Test User"}"#), None);
        assert_eq!(
            contains.check("ADD USER", "[]").as_deref(),
            Some("Failed test ADD USER: Expected Test User but got []")
        );

        let omits = Expectation::Omits("User 9".into());
        assert_eq!(omits.check("GET ALL USERS", "[]"), None);
        assert_eq!(
            omits.check("GET ALL USERS", "User 9").as_deref(),
            Some("Failed test GET ALL USERS: Not expecting User 9 but got User 9")
        );
    }

    #[test]
    fn test_spec_requires_exactly_one_expectation() {
        let neither = spec(OperationKind::ListAll);
        assert!(matches!(
            TestCase::try_from(neither),
            Err(HarnessError::InvalidTestCase { .. })
        ));

        let mut both = spec(OperationKind::ListAll);
        both.expected = Some("[]".into());
        both.forbidden = Some("User".into());
        assert!(matches!(
            TestCase::try_from(both),
            Err(HarnessError::InvalidTestCase { reason, .. }) if reason.contains("not both")
        ));

        let mut blank = spec(OperationKind::ListAll);
        blank.expected = Some(String::new());
        assert!(TestCase::try_from(blank).is_err());
    }

    #[test]
    fn test_spec_requires_operation_arguments() {
        let mut get = spec(OperationKind::Get);
        get.expected = Some("Test User".into());
        match TestCase::try_from(get) {
            Err(HarnessError::InvalidTestCase { reason, .. }) => assert_eq!(reason, "missing id"),
            other => panic!("unexpected: {:?}", other),
        }

        let mut add_hours = spec(OperationKind::AddHours);
        add_hours.id = Some(1);
        add_hours.hours = Some(5);
        add_hours.expected = Some("5".into());
        let case = TestCase::try_from(add_hours).unwrap();
        assert_eq!(case.operation, Operation::AddHours { id: 1, hours: 5 });
        assert_eq!(case.expectation, Expectation::Contains("5".into()));
    }

    #[test]
    fn test_spec_deserializes_original_field_names() {
        let spec: TestCaseSpec = serde_json::from_str(
            r#"{"name":"DELETE USER","operation":"delete","id":12,"forbiddenSubstring":"User 9"}"#,
        )
        .unwrap();
        let case = TestCase::try_from(spec).unwrap();
        assert_eq!(case.operation, Operation::Delete { id: 12 });
        assert_eq!(case.expectation, Expectation::Omits("User 9".into()));
    }
}
