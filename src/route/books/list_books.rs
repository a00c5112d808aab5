use axum::extract::State;

use crate::{state::ApiState, store::Book};

use super::BooksResponse;

/// List every book in insertion order
#[utoipa::path(
    get,
    path = "/libros",
    tag = "libros",
    responses(
        (status = 200, description = "All books in insertion order", body = [Book])
    )
)]
pub async fn list_books(State(state): State<ApiState>) -> BooksResponse {
    let books = state.store().read().await.list().to_vec();

    tracing::debug!(count = books.len(), "Listing books");

    BooksResponse(books)
}
