use axum::{routing::get, Router};

use crate::state::ApiState;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route(
            "/libros",
            get(super::list_books::list_books).post(super::create_book::create_book),
        )
        // Non-strict routing: a trailing slash reaches the collection too.
        .route(
            "/libros/",
            get(super::list_books::list_books).post(super::create_book::create_book),
        )
        // Static segments outrank parameters, so `buscar` never reaches `get_book`.
        .route("/libros/buscar", get(super::search_books::search_books))
        .route("/libros/:id", get(super::get_book::get_book))
}
