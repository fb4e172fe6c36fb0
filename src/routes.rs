use axum::{
    routing::get,
    Router,
};
use crate::{
    handlers,
    middleware,
    services::UserStore,
};

/// Builds the `/users` API around an existing store.
pub fn app(store: UserStore) -> Router {
    Router::new()
        .route(
            "/users",
            get(handlers::list_users)
                .post(handlers::create_user)
                .delete(handlers::delete_all_users),
        )
        .route(
            "/users/:id",
            get(handlers::get_user)
                .put(handlers::rename_user)
                .patch(handlers::add_hours)
                .delete(handlers::delete_user),
        )
        .layer(middleware::cors_layer())
        .with_state(store)
}
