use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{AlgorithmParameters, JwkSet, KeyAlgorithm, PublicKeyUse};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tracing::{info, warn};

use super::{AuthError, Claims};
use crate::config::AuthConfig;

/// Errors raised while building the signing-key set at startup
#[derive(Debug, thiserror::Error)]
pub enum KeySetError {
    #[error("no signing keys configured; set AUTH_DOMAIN, AUTH_JWKS_URL or AUTH_JWT_SECRET")]
    NotConfigured,

    #[error("failed to fetch JWKS from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("JWKS contains no usable RS256 signing keys")]
    Empty,
}

struct SigningKey {
    kid: Option<String>,
    algorithm: Algorithm,
    decoding: DecodingKey,
}

/// Immutable set of token verification keys plus the issuer/audience
/// expectations checked on every token. Built once and shared read-only.
pub struct SigningKeys {
    keys: Vec<SigningKey>,
    issuer: Option<String>,
    audience: Option<String>,
    leeway: u64,
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("kids", &self.kids().collect::<Vec<_>>())
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl SigningKeys {
    /// Single HS256 key from a shared secret
    pub fn from_secret(secret: &str) -> Self {
        Self {
            keys: vec![SigningKey {
                kid: None,
                algorithm: Algorithm::HS256,
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }],
            issuer: None,
            audience: None,
            leeway: 60,
        }
    }

    /// RS256 keys from a JWKS document. Keys marked for encryption, keys
    /// for other algorithms and keys that fail to load are skipped.
    pub fn from_jwks(set: &JwkSet) -> Result<Self, KeySetError> {
        let mut keys = Vec::new();

        for jwk in &set.keys {
            let kid = jwk.common.key_id.clone();

            if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
                continue;
            }
            if !matches!(jwk.algorithm, AlgorithmParameters::RSA(_)) {
                warn!("Skipping non-RSA JWK {:?}", kid);
                continue;
            }
            if !matches!(jwk.common.key_algorithm, None | Some(KeyAlgorithm::RS256)) {
                warn!("Skipping JWK {:?} with unsupported algorithm", kid);
                continue;
            }

            match DecodingKey::from_jwk(jwk) {
                Ok(decoding) => keys.push(SigningKey {
                    kid,
                    algorithm: Algorithm::RS256,
                    decoding,
                }),
                Err(e) => warn!("Skipping unreadable JWK {:?}: {}", kid, e),
            }
        }

        if keys.is_empty() {
            return Err(KeySetError::Empty);
        }

        Ok(Self {
            keys,
            issuer: None,
            audience: None,
            leeway: 60,
        })
    }

    /// Download and load a JWKS document
    pub async fn fetch(url: &str) -> Result<Self, KeySetError> {
        let fetch_err = |source| KeySetError::Fetch {
            url: url.to_string(),
            source,
        };

        let set = reqwest::get(url)
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(fetch_err)?
            .json::<JwkSet>()
            .await
            .map_err(fetch_err)?;

        let keys = Self::from_jwks(&set)?;
        info!("Loaded {} signing key(s) from {}", keys.len(), url);
        Ok(keys)
    }

    /// Build from configuration: the JWKS endpoint when one is configured,
    /// otherwise the shared secret.
    pub async fn from_config(auth: &AuthConfig) -> Result<Self, KeySetError> {
        let keys = match (auth.jwks_url(), auth.jwt_secret.as_deref()) {
            (Some(url), _) => {
                if auth.audience.is_none() {
                    warn!("AUTH_AUDIENCE is unset; tokens issued for any API by {} will be accepted", url);
                }
                Self::fetch(&url).await?
            }
            (None, Some(secret)) => {
                warn!("Using shared-secret HS256 token verification; not for production use");
                Self::from_secret(secret)
            }
            (None, None) => return Err(KeySetError::NotConfigured),
        };

        Ok(keys
            .with_issuer(auth.issuer())
            .with_audience(auth.audience.clone())
            .with_leeway(auth.leeway_secs))
    }

    pub fn with_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn with_audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn kids(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().filter_map(|k| k.kid.as_deref())
    }

    /// Verify signature, expiry, issuer and audience, returning the claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::TokenInvalid("unable to parse authentication token".to_string()))?;

        let key = self.select(header.kid.as_deref())?;
        if header.alg != key.algorithm {
            return Err(AuthError::TokenInvalid(format!(
                "unexpected signing algorithm {:?}",
                header.alg
            )));
        }

        let mut validation = Validation::new(key.algorithm);
        validation.leeway = self.leeway;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        decode::<Claims>(token, &key.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenInvalid(describe(e.kind()).to_string()))
    }

    fn select(&self, kid: Option<&str>) -> Result<&SigningKey, AuthError> {
        let found = match kid {
            Some(kid) => self.keys.iter().find(|k| k.kid.as_deref() == Some(kid)),
            None if self.keys.len() == 1 => self.keys.first(),
            None => None,
        };
        found.ok_or_else(|| AuthError::TokenInvalid("unable to find the appropriate key".to_string()))
    }
}

fn describe(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ExpiredSignature => "token expired",
        ErrorKind::ImmatureSignature => "token not yet valid",
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
            "incorrect claims, check the audience and issuer"
        }
        ErrorKind::InvalidSignature => "signature verification failed",
        ErrorKind::MissingRequiredClaim(_) => "token is missing a required claim",
        _ => "unable to parse authentication token",
    }
}
