use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_book, create_borrowing, delete_book, get_book, get_borrowing, get_payment,
    list_books, list_borrowings, list_payments, patch_book, return_borrowing, update_book,
    update_payment,
};

/// Creates the API router with all lending endpoints
///
/// Catalog:
/// - GET, POST /books/
/// - GET, PUT, PATCH, DELETE /books/:id/
///
/// Lending (`/borrowing/` is accepted as an alias of `/borrowings/`):
/// - GET, POST /borrowings/
/// - GET /borrowings/:id/
/// - POST /borrowings/:id/return_book/
///
/// Payments:
/// - GET /payments/
/// - GET, PATCH /payments/:id/
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/books/", get(list_books).post(create_book))
        .route(
            "/books/:id/",
            get(get_book)
                .put(update_book)
                .patch(patch_book)
                .delete(delete_book),
        )
        .route("/payments/", get(list_payments))
        .route("/payments/:id/", get(get_payment).patch(update_payment));

    ["/borrowings", "/borrowing"]
        .into_iter()
        .fold(router, add_borrowing_routes)
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

fn add_borrowing_routes(router: Router<Arc<AppState>>, prefix: &str) -> Router<Arc<AppState>> {
    router
        .route(
            &format!("{}/", prefix),
            get(list_borrowings).post(create_borrowing),
        )
        .route(&format!("{}/:id/", prefix), get(get_borrowing))
        .route(
            &format!("{}/:id/return_book/", prefix),
            post(return_borrowing),
        )
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
