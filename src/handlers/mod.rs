mod users;

pub use users::{list_users, get_user, create_user, rename_user, add_hours, delete_user, delete_all_users};
