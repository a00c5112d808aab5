//! Router-level tests for the `/libros` API.
//!
//! Every test builds its own state, so stores never leak between tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use libros_api::{
    error::ErrorVerbosity,
    server::{app, with_http_tracing},
    state::ApiState,
    store::{Book, BookStore},
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_app() -> Router {
    create_test_app_with(ErrorVerbosity::Message, BookStore::seeded())
}

fn create_test_app_with(verbosity: ErrorVerbosity, store: BookStore) -> Router {
    app(ApiState::new(verbosity, store))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();

    (status, body.to_vec())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;

    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: &Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, body.to_string()).await
}

async fn post_raw(app: &Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/libros")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(app, request).await;

    (status, serde_json::from_slice(&body).unwrap())
}

fn books(value: Value) -> Vec<Book> {
    serde_json::from_value(value).unwrap()
}

const INVALID_BOOK: &str =
    "Datos invalidos o faltantes. Se requiere 'name' (string) y 'year_of_publication' (number).";

#[tokio::test]
async fn list_returns_seeded_books_in_order() {
    let app = create_test_app();

    let (status, body) = get(&app, "/libros").await;

    assert_eq!(status, StatusCode::OK);

    let listed = books(body);
    assert_eq!(listed, BookStore::seeded().list().to_vec());
    assert_eq!(listed[0].name, "Cien años de soledad");
    assert_eq!(listed[3].author, "F. Scott Fitzgerald");
}

#[tokio::test]
async fn list_on_empty_store_is_an_empty_array() {
    let app = create_test_app_with(ErrorVerbosity::Message, BookStore::empty());

    let (status, body) = get(&app, "/libros").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn get_by_id_returns_seeded_record() {
    let app = create_test_app();

    let (status, body) = get(&app, "/libros/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": 2,
            "name": "1984",
            "year_of_publication": 1949,
            "author": "George Orwell"
        })
    );
}

#[tokio::test]
async fn get_by_unknown_id_is_not_found() {
    let app = create_test_app();

    for id in [0, 5, 99, -1] {
        let (status, body) = get(&app, &format!("/libros/{id}")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "mensaje": format!("Libro con el ID {id} no encontrado.") })
        );
    }
}

#[tokio::test]
async fn get_by_non_numeric_id_is_a_validation_error() {
    let app = create_test_app();

    for raw in ["abc", "buscarx", "x2", "-"] {
        let (status, body) = get(&app, &format!("/libros/{raw}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "mensaje": "El ID debe ser un número." }));
    }
}

#[tokio::test]
async fn get_by_id_reads_the_leading_integer() {
    let app = create_test_app();

    for raw in ["2x", "2abc", "2.9", "%202"] {
        let (status, body) = get(&app, &format!("/libros/{raw}")).await;

        assert_eq!(status, StatusCode::OK, "{raw}");
        assert_eq!(body["name"], "1984");
        assert_eq!(body["author"], "George Orwell");
    }

    let (status, body) = get(&app, "/libros/9zz").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "mensaje": "Libro con el ID 9 no encontrado." }));
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let app = create_test_app();

    for term in ["mundo", "MUNDO", "undo fel"] {
        let uri = format!("/libros/buscar?name={}", term.replace(' ', "%20"));
        let (status, body) = get(&app, &uri).await;

        assert_eq!(status, StatusCode::OK);

        let found = books(body);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Un Mundo Feliz");
    }
}

#[tokio::test]
async fn search_keeps_store_order() {
    let app = create_test_app();

    let (status, body) = get(&app, "/libros/buscar?name=el").await;

    assert_eq!(status, StatusCode::OK);

    let ids: Vec<i64> = books(body).into_iter().map(|book| book.id).collect();
    assert_eq!(ids, vec![3, 4]);
}

#[tokio::test]
async fn search_without_matches_is_not_found() {
    let app = create_test_app();

    let (status, body) = get(&app, "/libros/buscar?name=zzz").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "mensaje": "No se encontraron libros que contengan: 'zzz'" })
    );
}

#[tokio::test]
async fn search_without_name_is_a_validation_error() {
    let app = create_test_app();

    for uri in ["/libros/buscar", "/libros/buscar?name=", "/libros/buscar?other=1"] {
        let (status, body) = get(&app, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body,
            json!({ "mensaje": "Debe proporcionar un parámetro 'name' para la búsqueda." })
        );
    }
}

#[tokio::test]
async fn search_route_wins_over_id_route() {
    let app = create_test_app();

    let (status, body) = get(&app, "/libros/buscar?name=a").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!books(body).is_empty());
}

#[tokio::test]
async fn create_appends_with_next_id() {
    let app = create_test_app();

    let (status, body) = post_json(
        &app,
        json!({
            "name": "Pedro Páramo",
            "year_of_publication": 1955,
            "author": "Juan Rulfo"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 5,
            "name": "Pedro Páramo",
            "year_of_publication": 1955,
            "author": "Juan Rulfo"
        })
    );

    let (_, body) = get(&app, "/libros").await;
    let listed = books(body);
    assert_eq!(listed.len(), 5);
    assert_eq!(listed[4].id, 5);

    let (status, body) = get(&app, "/libros/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Pedro Páramo");

    let (status, body) = post_json(
        &app,
        json!({ "name": "Ficciones", "year_of_publication": 1944 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 6);
}

#[tokio::test]
async fn create_without_author_uses_default() {
    let app = create_test_app();

    let (status, body) = post_json(&app, json!({ "name": "X", "year_of_publication": 2000 })).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"], "Desconocido");
}

#[tokio::test]
async fn create_with_missing_or_mistyped_fields_is_rejected() {
    let app = create_test_app();

    let payloads = [
        json!({ "name": "X" }),
        json!({ "year_of_publication": 2000 }),
        json!({ "name": "", "year_of_publication": 2000 }),
        json!({ "name": 1, "year_of_publication": 2000 }),
        json!({ "name": "X", "year_of_publication": "2000" }),
        json!({ "name": "X", "year_of_publication": 2000.5 }),
        json!([1, 2, 3]),
    ];

    for payload in payloads {
        let (status, body) = post_json(&app, payload.clone()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body, json!({ "mensaje": INVALID_BOOK }));
    }

    let (_, body) = get(&app, "/libros").await;
    assert_eq!(books(body).len(), 4);

    let (_, body) = post_json(&app, json!({ "name": "X", "year_of_publication": 2000 })).await;
    assert_eq!(body["id"], 5);
}

#[tokio::test]
async fn create_with_malformed_body_is_rejected() {
    let app = create_test_app();

    let (status, body) = post_raw(&app, "{ not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "mensaje": INVALID_BOOK }));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/libros")
        .body(Body::from(r#"{"name":"X","year_of_publication":2000}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "mensaje": INVALID_BOOK }));
}

#[tokio::test]
async fn concurrent_creates_mint_unique_ids() {
    let app = create_test_app();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let app = app.clone();

            tokio::spawn(async move {
                let book = json!({ "name": format!("Libro {i}"), "year_of_publication": 2000 });

                post_json(&app, book).await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["id"].as_i64().unwrap());
    }

    ids.sort_unstable();
    assert_eq!(ids, (5..25).collect::<Vec<i64>>());

    let (_, body) = get(&app, "/libros").await;
    assert_eq!(books(body).len(), 24);
}

#[tokio::test]
async fn unknown_route_and_method_are_not_found() {
    let app = create_test_app();

    let (status, body) = get(&app, "/autores").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "mensaje": "No se encontró la ruta GET /autores." }));

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/libros/1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "mensaje": "No se encontró la ruta DELETE /libros/1." }));
}

#[tokio::test]
async fn full_verbosity_exposes_error_details() {
    let app = create_test_app_with(ErrorVerbosity::Full, BookStore::seeded());

    let (status, body) = get(&app, "/libros/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mensaje"], "Libro con el ID 7 no encontrado.");
    assert_eq!(body["error_type"], "NotFound");
    assert_eq!(body["error"]["kind"], "Book");
    assert_eq!(body["error"]["id"], 7);

    let (status, body) = post_raw(&app, "[\"X\", 2000]".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "Validation");
    assert_eq!(body["error"]["kind"], "InvalidBook");
    assert!(body["error"]["expected_schema"].is_string());
}

#[tokio::test]
async fn status_code_verbosity_sends_empty_error_bodies() {
    let app = create_test_app_with(ErrorVerbosity::StatusCode, BookStore::seeded());

    let request = Request::builder()
        .uri("/libros/abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = create_test_app();

    let (status, body) = get(&app, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/libros/buscar"].is_object());
}

#[tokio::test]
async fn http_tracing_leaves_responses_untouched() {
    let state = ApiState::new(ErrorVerbosity::Message, BookStore::seeded());
    let app = with_http_tracing(app(state.clone()), state);

    let (status, body) = get(&app, "/libros/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "1984");

    let (status, body) = get(&app, "/libros/buscar?name=zzz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "mensaje": "No se encontraron libros que contengan: 'zzz'" })
    );

    let (status, body) = post_json(&app, json!({ "name": "X", "year_of_publication": 2000 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 5);
}

#[tokio::test]
async fn repeated_search_name_uses_the_first_value() {
    let app = create_test_app();

    let (status, body) = get(&app, "/libros/buscar?name=mundo&name=zzz").await;

    assert_eq!(status, StatusCode::OK);

    let found = books(body);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Un Mundo Feliz");
}

#[tokio::test]
async fn trailing_slash_serves_the_collection() {
    let app = create_test_app();

    let (status, body) = get(&app, "/libros/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books(body).len(), 4);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/libros/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"X","year_of_publication":2000}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 5);
}
