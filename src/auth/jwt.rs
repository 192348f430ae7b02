use std::time::Duration;

use anyhow::Context;
use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::{claims::Claims, repo_types::User},
    config::JwtConfig,
    state::AppState,
};

/// HS256 signing and verification keys derived from the process secret.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Option<Duration>,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        let JwtConfig { secret, ttl_minutes } = config;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: ttl_minutes
                .and_then(|m| u64::try_from(m).ok())
                .map(|m| Duration::from_secs(m.saturating_mul(60))),
        }
    }

    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = match self.ttl {
            Some(ttl) => {
                let secs = i64::try_from(ttl.as_secs()).context("token ttl out of range")?;
                let exp = now
                    .checked_add(TimeDuration::seconds(secs))
                    .context("token expiry out of range")?;
                Some(exp.unix_timestamp() as usize)
            }
            None => None,
        };
        let claims = Claims {
            user_id: user.id,
            user_first_name: user.first_name.clone(),
            user_last_name: user.last_name.clone(),
            iat: now.unix_timestamp() as usize,
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        if self.ttl.is_none() {
            validation.validate_exp = false;
            validation.required_spec_claims.clear();
        }
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.user_id, "jwt verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_keys(secret: &str, ttl_minutes: Option<i64>) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            ttl_minutes,
        })
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$dummy".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn sign_and_verify_carries_user_claims() {
        let keys = make_keys("dev-secret", None);
        let user = user();
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.user_first_name, "Ada");
        assert_eq!(claims.user_last_name, "Lovelace");
        assert!(claims.exp.is_none());
    }

    #[test]
    fn token_payload_uses_wire_claim_names() {
        let keys = make_keys("dev-secret", None);
        let token = keys.sign(&user()).expect("sign");
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let raw = decode::<serde_json::Value>(&token, &keys.decoding, &validation)
            .expect("decode raw")
            .claims;
        for key in ["userID", "userFirstName", "userLastName", "iat"] {
            assert!(raw.get(key).is_some(), "missing {key}");
        }
        assert!(raw.get("exp").is_none());
        assert!(raw.get("password_hash").is_none());
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let token = make_keys("secret-a", None).sign(&user()).expect("sign");
        assert!(make_keys("secret-b", None).verify(&token).is_err());
    }

    #[test]
    fn ttl_adds_exp_claim() {
        let keys = make_keys("dev-secret", Some(5));
        let claims = keys.verify(&keys.sign(&user()).unwrap()).unwrap();
        let exp = claims.exp.expect("exp set");
        assert_eq!(exp - claims.iat, 5 * 60);
    }

    #[test]
    fn expired_token_is_rejected_when_ttl_configured() {
        let keys = make_keys("dev-secret", Some(5));
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            user_id: Uuid::new_v4(),
            user_first_name: "A".into(),
            user_last_name: "B".into(),
            iat: now - 7200,
            exp: Some(now - 3600),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn oversized_ttl_fails_to_sign_instead_of_panicking() {
        let keys = make_keys("dev-secret", Some(i64::MAX));
        assert!(keys.sign(&user()).is_err());
    }
}
