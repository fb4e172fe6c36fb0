use crate::config::HarnessConfig;
use crate::errors::HarnessResult;
use crate::models::{Operation, TestCase};

const EXTRA_USERS: usize = 10;

/// Which record the delete steps of the default suite target.
///
/// After the opening delete-all, ids are handed out in order: two named users
/// followed by the extra users, so the last extra user gets id 12.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteOptions {
    pub delete_target_id: u32,
    pub delete_target_marker: String,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            delete_target_id: 12,
            delete_target_marker: "User 9".into(),
        }
    }
}

impl SuiteOptions {
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            delete_target_id: config.delete_target_id,
            delete_target_marker: config.delete_target_marker.clone(),
        }
    }
}

pub fn default_suite(options: &SuiteOptions) -> Vec<TestCase> {
    let mut cases = vec![
        TestCase::expecting("DELETE ALL USERS", Operation::DeleteAll, "[]"),
        TestCase::expecting("GET ALL USERS", Operation::ListAll, "[]"),
        TestCase::expecting("ADD USER", Operation::Create { name: "Test User".into() }, "Test User"),
        TestCase::expecting("GET USER", Operation::Get { id: 1 }, "Test User"),
        TestCase::expecting("ADD USER", Operation::Create { name: "Another User".into() }, "Another User"),
        TestCase::expecting(
            "UPDATE USER",
            Operation::Rename { id: 1, name: "Updated User".into() },
            "Updated User",
        ),
        TestCase::expecting("ADD HOURS", Operation::AddHours { id: 1, hours: 5 }, "5"),
    ];

    for i in 0..EXTRA_USERS {
        let name = format!("User {}", i);
        cases.push(TestCase::expecting("ADD USER", Operation::Create { name: name.clone() }, &name));
    }

    let last_user = format!("User {}", EXTRA_USERS - 1);
    let marker = options.delete_target_marker.as_str();
    cases.push(TestCase::expecting("GET ALL USERS", Operation::ListAll, &last_user));
    cases.push(TestCase::expecting(
        "DELETE USER",
        Operation::Delete { id: options.delete_target_id },
        marker,
    ));
    cases.push(TestCase::forbidding("GET ALL USERS", Operation::ListAll, marker));

    cases
}

/// The configured cases when present, otherwise the default suite.
///
/// Every configured case is validated up front so a bad entry rejects the
/// whole run before any request is sent.
pub fn load_suite(config: &HarnessConfig) -> HarnessResult<Vec<TestCase>> {
    match &config.cases {
        Some(specs) => specs.iter().cloned().map(TestCase::try_from).collect(),
        None => Ok(default_suite(&SuiteOptions::from_config(config))),
    }
}
