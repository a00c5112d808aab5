use axum::{
    async_trait,
    extract::{FromRequest, Json as AxumJson, Request},
};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::error::{
    ApiError, ErrorVerbosityProvider, InternalServerError, ValidationError, ValidationErrorType,
};

/// A Wrapper around [`axum::extract::Json`] that rejects with an [`ApiError`].
///
/// Extracts the request body as JSON consuming the request.
/// The only JSON body the service accepts is a book, so every rejection is an invalid book.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "json_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = AxumJson::<T>::from_request(req, state).await;

        match json {
            Ok(json) => {
                tracing::trace!(json=?json.0, "Extracted");

                Ok(ApiJson(json.0))
            }
            Err(json_rejection) => {
                tracing::warn!(rejection=?json_rejection, "Rejection");

                let verbosity = state.error_verbosity();

                let reason = json_rejection.body_text();

                let expected_schema = verbosity
                    .should_generate_error_reason()
                    .then(|| serde_yaml::to_string(&schema_for!(T)))
                    .transpose()
                    .map_err(|err| InternalServerError::from_generic_error(verbosity, err))?;

                Err(
                    ValidationError::new(verbosity, ValidationErrorType::InvalidBook { reason })
                        .with_expected_schema(expected_schema)
                        .into(),
                )
            }
        }
    }
}
