//! Request extractors that reject with the gateway's JSON error body.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::HuginnError;

/// [`Query`] whose rejection is an [`ApiError`], so an unparsable value
/// such as `?page=abc` gets the same `{"message"}` 400 as any other
/// validation failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::new(
                "request",
                HuginnError::MalformedParameter {
                    param: "query string",
                    reason: rejection.body_text(),
                },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Paging {
        page: Option<u32>,
    }

    async fn extract(uri: &str) -> Result<ApiQuery<Paging>, ApiError> {
        let (mut parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ApiQuery::<Paging>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn parses_valid_query() {
        let ApiQuery(paging) = extract("/trending?page=3").await.unwrap();
        assert_eq!(paging.page, Some(3));
    }

    #[tokio::test]
    async fn unparsable_value_is_a_bad_request() {
        let err = extract("/trending?page=abc").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
