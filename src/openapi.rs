use utoipa::OpenApi;

use crate::{
    error::ApiErrorMessage,
    route::books::{create_book, get_book, list_books, search_books},
    store::Book,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books::list_books,
        search_books::search_books,
        get_book::get_book,
        create_book::create_book,
    ),
    components(schemas(Book, create_book::CreateBookPayload, ApiErrorMessage)),
    tags((name = "libros", description = "In-memory book catalogue"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_book_route() {
        let doc = ApiDoc::openapi();

        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        assert!(paths.contains(&"/libros"));
        assert!(paths.contains(&"/libros/buscar"));
        assert!(paths.contains(&"/libros/{id}"));
    }
}
