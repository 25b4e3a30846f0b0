//! Bearer credential verification.
//!
//! Credentials are HS256-signed JWTs carrying a `sub` (the user id), an `iat` and an
//! `exp` claim. Verification is a pure function of the credential, the server secret
//! and the clock, so [`IdentityVerifier`] can be shared freely between connections.

use crate::connection::UserId;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Validity window of an issued credential (24 hours).
pub const DEFAULT_VALIDITY_SECS: u64 = 60 * 60 * 24;

/// Why a credential (or a handshake) was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Invalid token: malformed credential")]
    Malformed,
    #[error("Invalid token: credential expired")]
    Expired,
    #[error("Invalid token: signature mismatch")]
    SignatureInvalid,
    #[error("Invalid token: no subject")]
    SubjectMissing,
    #[error("No credential supplied")]
    MissingCredential,
    #[error("Handshake timed out")]
    HandshakeTimeout,
    #[error("Connection already closed")]
    ConnectionClosed,
}

impl Rejection {
    /// Stable machine-readable code sent alongside the human readable message.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::Malformed => "malformed",
            Rejection::Expired => "expired",
            Rejection::SignatureInvalid => "signature_invalid",
            Rejection::SubjectMissing => "subject_missing",
            Rejection::MissingCredential => "missing_credential",
            Rejection::HandshakeTimeout => "handshake_timeout",
            Rejection::ConnectionClosed => "connection_closed",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) exp: Option<i64>,
}

/// Issues and verifies access credentials with a single server-held secret.
#[derive(Clone)]
pub struct IdentityVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity_secs: i64,
}

impl IdentityVerifier {
    pub fn new(secret: &str, validity_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            validity_secs: i64::try_from(validity_secs).unwrap_or(i64::MAX),
        }
    }

    /// Validity window applied to newly issued credentials, in seconds.
    pub fn validity_secs(&self) -> i64 {
        self.validity_secs
    }

    /// Issue a credential for `subject`, valid from `issued_at` for the configured window.
    pub fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: Some(subject.to_owned()),
            iat: Some(iat),
            exp: Some(iat.saturating_add(self.validity_secs)),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(subject, Utc::now())
    }

    pub fn verify(&self, credential: &str) -> Result<UserId, Rejection> {
        self.verify_at(credential, Utc::now())
    }

    /// Verify `credential` as of `now`, returning the subject it was issued for.
    pub fn verify_at(&self, credential: &str, now: DateTime<Utc>) -> Result<UserId, Rejection> {
        let token = decode::<Claims>(credential, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    Rejection::SignatureInvalid
                }
                ErrorKind::ExpiredSignature => Rejection::Expired,
                _ => Rejection::Malformed,
            },
        )?;

        let exp = token.claims.exp.ok_or(Rejection::Malformed)?;
        if now.timestamp() >= exp {
            return Err(Rejection::Expired);
        }

        match token.claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(Rejection::SubjectMissing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test-secret";

    fn verifier() -> IdentityVerifier {
        IdentityVerifier::new(SECRET, DEFAULT_VALIDITY_SECS)
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn verify_returns_the_embedded_subject() {
        let verifier = verifier();
        let token = verifier.issue("user-a").unwrap();

        assert_eq!(verifier.verify(&token), Ok("user-a".to_string()));
    }

    #[test]
    fn verify_is_repeatable() {
        let verifier = verifier();
        let token = verifier.issue("user-a").unwrap();

        assert_eq!(verifier.verify(&token), verifier.verify(&token));
    }

    #[test]
    fn verify_rejects_credentials_past_their_window() {
        let verifier = verifier();
        let issued_at = Utc::now() - Duration::hours(25);
        let token = verifier.issue_at("user-a", issued_at).unwrap();

        assert_eq!(verifier.verify(&token), Err(Rejection::Expired));
    }

    #[test]
    fn verify_accepts_credentials_just_inside_their_window() {
        let verifier = verifier();
        let issued_at = Utc::now();
        let token = verifier.issue_at("user-a", issued_at).unwrap();
        let almost_expired = issued_at + Duration::hours(24) - Duration::seconds(1);

        assert_eq!(
            verifier.verify_at(&token, almost_expired),
            Ok("user-a".to_string())
        );
        assert_eq!(
            verifier.verify_at(&token, issued_at + Duration::hours(24)),
            Err(Rejection::Expired)
        );
    }

    #[test]
    fn verify_rejects_garbage() {
        assert_eq!(verifier().verify("not-a-jwt"), Err(Rejection::Malformed));
        assert_eq!(verifier().verify(""), Err(Rejection::Malformed));
    }

    #[test]
    fn verify_rejects_a_foreign_signature() {
        let now = Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: Some("user-a".to_string()),
                iat: Some(now),
                exp: Some(now + 60),
            },
            "some-other-secret",
        );

        assert_eq!(verifier().verify(&token), Err(Rejection::SignatureInvalid));
    }

    #[test]
    fn verify_rejects_a_missing_subject() {
        let now = Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: None,
                iat: Some(now),
                exp: Some(now + 60),
            },
            SECRET,
        );

        assert_eq!(verifier().verify(&token), Err(Rejection::SubjectMissing));
    }

    #[test]
    fn verify_rejects_a_credential_without_expiry() {
        let token = sign(
            &Claims {
                sub: Some("user-a".to_string()),
                iat: None,
                exp: None,
            },
            SECRET,
        );

        assert_eq!(verifier().verify(&token), Err(Rejection::Malformed));
    }

    #[test]
    fn rejection_codes_are_stable() {
        assert_eq!(Rejection::Expired.code(), "expired");
        assert_eq!(Rejection::SignatureInvalid.code(), "signature_invalid");
        assert_eq!(Rejection::SubjectMissing.code(), "subject_missing");
        assert_eq!(Rejection::Malformed.code(), "malformed");
    }
}
