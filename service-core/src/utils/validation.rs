use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor whose rejections render as [`AppError::BadRequest`],
/// so schema failures share the `{"detail": ...}` body of every other error.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| {
                tracing::debug!(error = %e.body_text(), "Rejected request body");
                AppError::BadRequest(anyhow::anyhow!(e.body_text()))
            })?;

        Ok(ApiJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_well_formed_body() {
        let request = json_request(r#"{"name":"a"}"#);
        let ApiJson(payload) = ApiJson::<Payload>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(payload.name, "a");
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable() {
        let err = match ApiJson::<Payload>::from_request(json_request("{}"), &()).await {
            Ok(_) => panic!("expected rejection"),
            Err(e) => e,
        };

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.to_string().contains("name"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn missing_content_type_is_unprocessable() {
        let req = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"name":"a"}"#))
            .unwrap();

        let err = match ApiJson::<Payload>::from_request(req, &()).await {
            Ok(_) => panic!("expected rejection"),
            Err(e) => e,
        };
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
