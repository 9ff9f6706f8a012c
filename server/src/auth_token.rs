use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const MIN_SECRET_LEN: usize = 32;
const TOKEN_ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, thiserror::Error)]
pub enum AuthTokenError {
    #[error("auth token secret is too short (min {MIN_SECRET_LEN} bytes)")]
    SecretTooShort,

    #[error("invalid auth token format")]
    InvalidFormat,

    #[error("auth token signature is invalid")]
    InvalidSignature,

    #[error("auth token is expired")]
    Expired,

    #[error("failed to decode auth token payload")]
    PayloadDecode,

    #[error("failed to parse auth token payload")]
    PayloadParse,

    #[error("auth token carries no identity")]
    MissingIdentity,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct TokenHeader {
    alg: String,
    typ: String,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: TOKEN_ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }
}

/// Claims carried by an access token. `user_id` holds the account email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: String,
    pub jti: String,
    pub iat: u64,
    pub exp: u64,
}

impl TokenClaims {
    pub fn new(user_id: String, issued_at: u64, expires_at: u64) -> Self {
        Self {
            user_id,
            jti: Uuid::new_v4().to_string(),
            iat: issued_at,
            exp: expires_at,
        }
    }

    pub fn is_expired(&self, reference_secs: u64) -> bool {
        reference_secs >= self.exp
    }
}

/// Body returned by signup and a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Stateless HS256 token issuer/verifier. Cheap to clone, shares the secret.
#[derive(Clone)]
pub struct AuthTokenService {
    secret: Arc<[u8]>,
    ttl: Duration,
}

impl AuthTokenService {
    pub fn new(secret: Vec<u8>, ttl: Duration) -> Result<Self, AuthTokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthTokenError::SecretTooShort);
        }

        Ok(Self {
            secret: Arc::<[u8]>::from(secret),
            ttl,
        })
    }

    pub fn issue_access_token(
        &self,
        email: &str,
        issued_at: u64,
    ) -> Result<String, AuthTokenError> {
        let expires_at = issued_at.saturating_add(self.ttl.as_secs());
        let claims = TokenClaims::new(email.to_string(), issued_at, expires_at);
        self.issue(&claims)
    }

    pub fn issue(&self, claims: &TokenClaims) -> Result<String, AuthTokenError> {
        let header =
            serde_json::to_vec(&TokenHeader::hs256()).map_err(|_| AuthTokenError::PayloadParse)?;
        let payload = serde_json::to_vec(claims).map_err(|_| AuthTokenError::PayloadParse)?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload)
        );
        let signature = self.sign(signing_input.as_bytes())?;
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);
        Ok(format!("{signing_input}.{signature_b64}"))
    }

    pub fn verify(&self, token: &str, reference_secs: u64) -> Result<TokenClaims, AuthTokenError> {
        let (signing_input, signature_b64) = token
            .rsplit_once('.')
            .ok_or(AuthTokenError::InvalidFormat)?;
        let (header_b64, payload_b64) = signing_input
            .split_once('.')
            .ok_or(AuthTokenError::InvalidFormat)?;

        let header = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| AuthTokenError::InvalidFormat)?;
        let header: TokenHeader =
            serde_json::from_slice(&header).map_err(|_| AuthTokenError::InvalidFormat)?;
        if header.alg != TOKEN_ALGORITHM {
            return Err(AuthTokenError::InvalidFormat);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthTokenError::InvalidFormat)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthTokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthTokenError::PayloadDecode)?;

        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthTokenError::PayloadParse)?;

        if claims.user_id.is_empty() {
            return Err(AuthTokenError::MissingIdentity);
        }
        if claims.is_expired(reference_secs) {
            return Err(AuthTokenError::Expired);
        }

        Ok(claims)
    }

    /// Verifies against the current clock. Every failure collapses to `None`.
    pub fn decode(&self, token: &str) -> Option<TokenClaims> {
        match self.verify(token, now_secs()) {
            Ok(claims) => Some(claims),
            Err(err) => {
                log::debug!("Rejected access token: {}", err);
                None
            }
        }
    }

    fn sign(&self, bytes: &[u8]) -> Result<Vec<u8>, AuthTokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(bytes);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
