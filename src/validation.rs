//! Request payload validation.
//!
//! Bodies are parsed as untyped JSON and checked field by field so that a
//! wrong primitive type (for example `"rating": "NaN"`) is reported as a
//! 400 rather than the 415/422 the stock `Json` extractor would produce.
//! Strings are never coerced into numbers or booleans.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::database::models::{GamePatch, NewCharacter, NewGame};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{0}' is out of range")]
    OutOfRange(&'static str),

    #[error("field '{0}' must not be blank")]
    Blank(&'static str),
}

/// A payload type that can be built from a JSON object
pub trait FromPayload: Sized {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, ValidationError>;
}

/// Parse raw bytes into a validated payload
pub fn parse<T: FromPayload>(bytes: &[u8]) -> Result<T, ValidationError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    validate(&value)
}

/// Validate an already-parsed JSON value
pub fn validate<T: FromPayload>(value: &Value) -> Result<T, ValidationError> {
    match value {
        Value::Object(map) => T::from_payload(&Fields(map)),
        _ => Err(ValidationError::NotAnObject),
    }
}

/// Typed accessors over a JSON object. `null` counts as absent.
pub struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    fn get(&self, name: &'static str) -> Option<&'a Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    fn required(&self, name: &'static str) -> Result<&'a Value, ValidationError> {
        self.get(name).ok_or(ValidationError::MissingField(name))
    }

    /// Required string with at least one non-whitespace character, kept as sent
    pub fn string(&self, name: &'static str) -> Result<String, ValidationError> {
        let s = self.required(name)?.as_str().ok_or(ValidationError::WrongType {
            field: name,
            expected: "a string",
        })?;
        if s.trim().is_empty() {
            return Err(ValidationError::Blank(name));
        }
        Ok(s.to_string())
    }

    pub fn integer(&self, name: &'static str) -> Result<i32, ValidationError> {
        to_i32(name, self.required(name)?)
    }

    pub fn boolean(&self, name: &'static str) -> Result<bool, ValidationError> {
        to_bool(name, self.required(name)?)
    }

    pub fn optional_integer(&self, name: &'static str) -> Result<Option<i32>, ValidationError> {
        self.get(name).map(|v| to_i32(name, v)).transpose()
    }

    pub fn optional_boolean(&self, name: &'static str) -> Result<Option<bool>, ValidationError> {
        self.get(name).map(|v| to_bool(name, v)).transpose()
    }
}

fn to_i32(name: &'static str, value: &Value) -> Result<i32, ValidationError> {
    let n = value.as_i64().ok_or_else(|| {
        if value.is_u64() {
            ValidationError::OutOfRange(name)
        } else {
            ValidationError::WrongType {
                field: name,
                expected: "an integer",
            }
        }
    })?;
    i32::try_from(n).map_err(|_| ValidationError::OutOfRange(name))
}

fn to_bool(name: &'static str, value: &Value) -> Result<bool, ValidationError> {
    value.as_bool().ok_or(ValidationError::WrongType {
        field: name,
        expected: "a boolean",
    })
}

impl FromPayload for NewGame {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, ValidationError> {
        Ok(NewGame {
            title: fields.string("title")?,
            rating: fields.integer("rating")?,
            completed: fields.boolean("completed")?,
        })
    }
}

impl FromPayload for NewCharacter {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, ValidationError> {
        Ok(NewCharacter {
            name: fields.string("name")?,
            fighting: fields.integer("fighting")?,
            intelligence: fields.integer("intelligence")?,
            good: fields.boolean("good")?,
            game_id: fields.integer("game_id")?,
        })
    }
}

impl FromPayload for GamePatch {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, ValidationError> {
        Ok(GamePatch {
            rating: fields.optional_integer("new_rating")?,
            completed: fields.optional_boolean("completed")?,
        })
    }
}

/// Extractor that reads the body and validates it into `T`, rejecting with
/// a 400 envelope. Ignores `Content-Type`.
pub struct Payload<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: FromPayload,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!("Failed to read request body: {}", e);
            ApiError::bad_request(e.to_string())
        })?;

        parse::<T>(&bytes).map(Payload).map_err(|e| {
            debug!("Rejected payload: {}", e);
            ApiError::from(e)
        })
    }
}

/// Record id taken from the last path segment. Anything that is not an
/// integer cannot name a row, so it is rejected as not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::not_found(e.body_text()))?;
        Ok(RecordId(id))
    }
}
