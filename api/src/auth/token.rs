//! Signed bearer tokens
//!
//! Format: `base64url(json claims).hex(hmac_sha256(secret, base64url part))`.
//! Tokens are issued by the identity provider; `sign` exists for tooling and tests.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::entities::CurrentUser;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    admin: bool,
    /// Expiry as unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

pub struct TokenVerifier {
    secret: Vec<u8>,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        HmacSha256::new_from_slice(&self.secret).expect("HMAC key of any size")
    }

    /// Issue a token for a user, optionally expiring at `exp` (unix seconds)
    #[cfg(test)]
    pub fn sign(&self, user: &CurrentUser, exp: Option<i64>) -> String {
        let claims = Claims {
            sub: user.user_id.clone(),
            admin: user.is_admin,
            exp,
        };
        let payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap_or_default());

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        format!("{}.{}", payload, hex::encode(mac.finalize().into_bytes()))
    }

    /// Check signature and expiry, returning the caller
    pub fn verify(&self, token: &str) -> Option<CurrentUser> {
        let (payload, signature) = token.split_once('.')?;

        let expected = hex::decode(signature).ok()?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        if mac.verify_slice(&expected).is_err() {
            tracing::warn!("Bearer token signature mismatch");
            return None;
        }

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&json).ok()?;

        if claims.exp.is_some_and(|exp| exp <= Utc::now().timestamp()) {
            tracing::debug!(user_id = %claims.sub, "Bearer token expired");
            return None;
        }
        if claims.sub.trim().is_empty() {
            return None;
        }

        Some(CurrentUser {
            user_id: claims.sub,
            is_admin: claims.admin,
        })
    }
}
