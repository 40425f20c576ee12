use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AuthError;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Fails when `now + ttl` is outside the representable date range.
    pub fn new(subject: impl Into<String>, ttl: Duration) -> Result<Self, AuthError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::TokenGeneration(format!("token lifetime out of range: {}", ttl)))?;
        Ok(Self {
            sub: Some(subject.into()),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

/// Issues and validates stateless HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, default_ttl: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        })
    }

    /// Sign a token for `subject` that expires after `ttl` (or the default TTL).
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<String, AuthError> {
        let claims = Claims::new(subject, ttl.unwrap_or(self.default_ttl))?;
        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Validate signature, expiry and subject; returns the subject.
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AuthError::InvalidToken
        })?;

        match token_data.claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", Duration::minutes(30)).unwrap()
    }

    #[test]
    fn issue_then_validate_returns_subject() {
        let tokens = service();
        let token = tokens.issue("admin", None).unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), "admin");
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let token = tokens.issue("admin", Some(Duration::seconds(-60))).unwrap();
        assert_eq!(tokens.validate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let tokens = service();
        let token = tokens.issue("admin", None).unwrap();
        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", head, flipped, &sig[1..]);
        assert_eq!(tokens.validate(&tampered), Err(AuthError::InvalidToken));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = TokenService::new("another-secret", Duration::minutes(30)).unwrap();
        let token = other.issue("admin", None).unwrap();
        assert_eq!(service().validate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let claims = Claims { sub: None, exp: (Utc::now() + Duration::minutes(5)).timestamp(), iat: Utc::now().timestamp() };
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret("unit-test-secret".as_bytes()),
        )
        .unwrap();
        assert_eq!(service().validate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(service().validate("not.a.jwt"), Err(AuthError::InvalidToken));
        assert_eq!(service().validate(""), Err(AuthError::InvalidToken));
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        // A million years is past the end of the supported calendar
        let too_long = Duration::days(365 * 1_000_000);
        let tokens = TokenService::new("unit-test-secret", too_long).unwrap();
        assert!(matches!(tokens.issue("admin", None), Err(AuthError::TokenGeneration(_))));
        assert!(matches!(
            service().issue("admin", Some(too_long)),
            Err(AuthError::TokenGeneration(_))
        ));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            TokenService::new("", Duration::minutes(30)),
            Err(AuthError::InvalidSecret)
        ));
    }
}
