//! HTTP server and routes.

mod handlers;
mod state;

pub use state::AppState;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let account_routes = Router::new()
        .route("/{id}", get(handlers::account_get))
        .route("/{id}", put(handlers::account_replace))
        .route("/{id}", patch(handlers::account_update))
        .route("/{id}", delete(handlers::account_delete))
        // Wishlist shelf
        .route("/{id}/books/wishlist", post(handlers::wishlist_add))
        .route("/{id}/books/wishlist", get(handlers::wishlist_list))
        // Finished shelf
        .route("/{id}/books/finished", post(handlers::finished_add))
        .route("/{id}/books/finished", get(handlers::finished_list))
        // Wishlist -> finished transition
        .route("/{id}/books/finished", put(handlers::book_complete));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .nest("/user", account_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
