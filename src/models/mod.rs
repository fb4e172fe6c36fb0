mod user;
mod forms;
mod test_case;

pub use user::User;
pub use forms::{NameForm, HoursForm};
pub use test_case::{TestCase, TestCaseSpec, Operation, OperationKind};
#[cfg(test)]
pub use test_case::Expectation;
