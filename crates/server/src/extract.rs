//! Extractors that run the route validation rules before a handler executes.
//! A rejection is always an [`ApiError::Validation`] carrying every failed rule.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde_json::{Map, Value};
use service::product::{
    validation::{self, ValidationErrors},
    ProductDraft,
};

use crate::errors::ApiError;

/// A path `:id` that parsed as a positive integer.
#[derive(Debug, Clone, Copy)]
pub struct ProductId(pub i32);

/// A create body that passed the create rules.
#[derive(Debug, Clone)]
pub struct NewProduct(pub ProductDraft);

/// Path id and body of a full replacement, validated together.
#[derive(Debug, Clone)]
pub struct ReplaceProduct {
    pub id: i32,
    pub draft: ProductDraft,
}

async fn raw_id<S: Send + Sync>(parts: &mut Parts, state: &S) -> String {
    // An unreadable segment is reported by the id rule like any other bad id
    Path::<String>::from_request_parts(parts, state)
        .await
        .map(|Path(raw)| raw)
        .unwrap_or_default()
}

/// Read the body as a JSON object. An empty body counts as `{}`.
async fn json_object<S: Send + Sync>(req: Request, state: &S) -> Result<Map<String, Value>, ApiError> {
    let bytes = Bytes::from_request(req, state)
        .await
        .map_err(|_| ValidationErrors::body(validation::MALFORMED_BODY))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ValidationErrors::body(validation::MALFORMED_BODY).into()),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = raw_id(parts, state).await;
        Ok(ProductId(validation::product_id(&raw)?))
    }
}

#[async_trait]
impl<S> FromRequest<S> for NewProduct
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = json_object(req, state).await?;
        Ok(NewProduct(validation::create_draft(&body)?))
    }
}

#[async_trait]
impl<S> FromRequest<S> for ReplaceProduct
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let raw = raw_id(&mut parts, state).await;
        let body = json_object(Request::from_parts(parts, body), state).await?;
        let (id, draft) = validation::replace_request(&raw, &body)?;
        Ok(ReplaceProduct { id, draft })
    }
}
