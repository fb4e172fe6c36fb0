mod user_store;
mod user_client;

pub use user_store::UserStore;
pub use user_client::UserClient;
