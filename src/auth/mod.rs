pub mod guard;
pub mod keys;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use guard::{require, Permissions};
pub use keys::{KeySetError, SigningKeys};

/// Permission names checked by the catalogue routes
pub mod permission {
    pub const GET_GAMES: &str = "get:games";
    pub const POST_GAMES: &str = "post:games";
    pub const PATCH_GAMES: &str = "patch:games";
    pub const DELETE_GAMES: &str = "delete:games";
    pub const GET_CHARACTERS: &str = "get:characters";
    pub const POST_CHARACTERS: &str = "post:characters";
    pub const DELETE_CHARACTERS: &str = "delete:characters";

    /// Every permission the API knows about, as granted to a catalogue admin
    pub const ALL: &[&str] = &[
        GET_GAMES,
        POST_GAMES,
        PATCH_GAMES,
        DELETE_GAMES,
        GET_CHARACTERS,
        POST_CHARACTERS,
        DELETE_CHARACTERS,
    ];

    /// Read-only permissions
    pub const READ_ONLY: &[&str] = &[GET_GAMES, GET_CHARACTERS];
}

/// `aud` may be a single string or a list, depending on the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    /// Space-delimited OAuth scopes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Claims {
    /// Union of the `permissions` claim and the `scope` entries
    pub fn permission_set(&self) -> Permissions {
        self.permissions
            .iter()
            .map(String::as_str)
            .chain(self.scope.split_whitespace())
            .collect()
    }
}

/// Errors raised while authenticating or authorizing a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is expected")]
    HeaderMissing,

    #[error("{0}")]
    HeaderMalformed(&'static str),

    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    #[error("Permission '{0}' not granted")]
    Forbidden(String),
}

impl AuthError {
    /// Machine-readable code for the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::HeaderMalformed(_) => "invalid_header",
            AuthError::TokenInvalid(_) => "invalid_token",
            AuthError::Forbidden(_) => "unauthorized",
        }
    }
}

/// Parameters for a locally signed development token
#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub subject: String,
    pub permissions: Vec<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub ttl: Duration,
}

impl TokenRequest {
    pub fn new<I, S>(subject: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            issuer: None,
            audience: None,
            ttl: Duration::hours(1),
        }
    }
}

/// Errors raised while minting a development token
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("token signing failed: {0}")]
    TokenGeneration(String),

    #[error("signing secret must not be empty")]
    InvalidSecret,
}

/// Sign an HS256 token with the shared development secret
pub fn issue_token(secret: &str, request: &TokenRequest) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let now = Utc::now();
    let expires = now
        .checked_add_signed(request.ttl)
        .ok_or_else(|| JwtError::TokenGeneration("ttl out of range".to_string()))?;
    let claims = serde_json::json!({
        "sub": request.subject,
        "iss": request.issuer,
        "aud": request.audience,
        "iat": now.timestamp(),
        "exp": expires.timestamp(),
        "jti": Uuid::new_v4().to_string(),
        "permissions": request.permissions,
    });

    // Drop unset registered claims rather than emitting nulls
    let claims = match claims {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        ),
        other => other,
    };

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}
