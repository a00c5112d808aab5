use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns only the appropriate status code with an empty body.
    StatusCode,
    /// Server returns `{"mensaje": ...}` with the appropriate status code.
    #[default]
    Message,
    /// Server returns the message, the error type and the error content with the appropriate status code.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

pub trait ErrorVerbosityProvider {
    fn error_verbosity(&self) -> ErrorVerbosity;
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorMessage {
    /// Human readable description of the failure.
    #[schema(example = "Libro con el ID 42 no encontrado.")]
    pub mensaje: String,
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    #[serde(flatten)]
    error: ApiError,
    mensaje: Cow<'static, str>,
}

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        let mensaje = error.mensaje();

        ApiErrorResponse { error, mensaje }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status_code = self.error.status_code();

        match self.error.verbosity() {
            ErrorVerbosity::StatusCode => status_code.into_response(),
            ErrorVerbosity::Message => (
                status_code,
                Json(ApiErrorMessage {
                    mensaje: self.mensaje.into_owned(),
                }),
            )
                .into_response(),
            ErrorVerbosity::Full => (status_code, Json(self)).into_response(),
        }
    }
}

#[derive(Debug, From, Serialize)]
#[serde(tag = "error_type", content = "error")]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// Infrastructure failure unrelated to the request content.
    InternalServerError(InternalServerError),
    /// Validation error
    ///
    /// The client supplied input that fails a presence, shape or type check.
    Validation(ValidationError),
    /// Not found error
    ///
    /// The request is well formed but references data or a route that does not exist.
    NotFound(NotFoundError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Validation(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
        }
    }

    pub fn mensaje(&self) -> Cow<'static, str> {
        match self {
            ApiError::InternalServerError(_) => Cow::Borrowed("Error interno del servidor."),
            ApiError::Validation(err) => Cow::Borrowed(err.kind.mensaje()),
            ApiError::NotFound(err) => Cow::Owned(err.kind.mensaje()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiErrorResponse::from(self).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum ValidationErrorType {
    /// The `:id` path segment is not an integer.
    InvalidId { raw: String },
    /// The `name` query parameter is missing, empty or undecodable.
    MissingSearchName,
    /// The book payload is missing a field, has a field of the wrong type or is not a JSON object.
    InvalidBook { reason: String },
}

impl ValidationErrorType {
    fn mensaje(&self) -> &'static str {
        match self {
            ValidationErrorType::InvalidId { .. } => "El ID debe ser un número.",
            ValidationErrorType::MissingSearchName => {
                "Debe proporcionar un parámetro 'name' para la búsqueda."
            }
            ValidationErrorType::InvalidBook { .. } => {
                "Datos invalidos o faltantes. Se requiere 'name' (string) y 'year_of_publication' (number)."
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    #[serde(flatten)]
    kind: ValidationErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_schema: Option<String>,
}

impl ValidationError {
    pub fn new(verbosity: ErrorVerbosity, kind: ValidationErrorType) -> Self {
        ValidationError {
            verbosity,
            kind,
            expected_schema: None,
        }
    }

    /// Attaches the YAML rendering of the schema the input was expected to match.
    ///
    /// Dropped unless the verbosity asks for error reasons.
    pub fn with_expected_schema(mut self, expected_schema: Option<String>) -> Self {
        let verbosity = self.verbosity;
        self.expected_schema = expected_schema.filter(|_| verbosity.should_generate_error_reason());

        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum NotFoundErrorType {
    /// No book carries the requested id.
    Book { id: i64 },
    /// No book name contains the search term.
    NoMatches { name: String },
    /// No route matches the request method and path.
    Route { method: String, path: String },
}

impl NotFoundErrorType {
    fn mensaje(&self) -> String {
        match self {
            NotFoundErrorType::Book { id } => format!("Libro con el ID {id} no encontrado."),
            NotFoundErrorType::NoMatches { name } => {
                format!("No se encontraron libros que contengan: '{name}'")
            }
            NotFoundErrorType::Route { method, path } => {
                format!("No se encontró la ruta {method} {path}.")
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    #[serde(flatten)]
    kind: NotFoundErrorType,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity, kind: NotFoundErrorType) -> Self {
        NotFoundError { verbosity, kind }
    }
}
