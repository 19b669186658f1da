//! RS256 JWT signing and session cookie verification

use crate::domain::entity::session_claims::SessionClaims;
use crate::error::{AuthError, AuthResult, SessionRejection};
use crate::infra::public_keys::KeySet;
use platform::crypto::{from_base64_url, to_base64_url};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::Sha256;

pub const ALGORITHM: &str = "RS256";

/// Longest accepted `sub`
pub const MAX_SUBJECT_LEN: usize = 128;

/// Tolerance for `iat` slightly ahead of our clock
pub const CLOCK_SKEW_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

/// Issuer of session cookies for a project
pub fn session_issuer(project_id: &str) -> String {
    format!("https://session.firebase.google.com/{project_id}")
}

fn encode_segment<T: Serialize>(value: &T) -> AuthResult<String> {
    let json = serde_json::to_vec(value).map_err(|e| AuthError::Internal(e.to_string()))?;
    Ok(to_base64_url(&json))
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, SessionRejection> {
    let bytes = from_base64_url(segment).map_err(|_| SessionRejection::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| SessionRejection::Malformed)
}

/// Sign `claims` as a compact RS256 JWT
pub fn sign_rs256<T: Serialize>(
    key: &SigningKey<Sha256>,
    kid: Option<&str>,
    claims: &T,
) -> AuthResult<String> {
    let header = JwtHeader {
        alg: ALGORITHM.to_string(),
        kid: kid.map(str::to_string),
        typ: Some("JWT".to_string()),
    };
    let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(claims)?);
    let signature: Signature = key.sign(signing_input.as_bytes());

    Ok(format!(
        "{signing_input}.{}",
        to_base64_url(&signature.to_vec())
    ))
}

#[derive(Debug, Deserialize)]
struct RawSessionClaims {
    iss: String,
    aud: String,
    #[serde(default)]
    sub: String,
    iat: i64,
    exp: i64,
    #[serde(default)]
    auth_time: Option<i64>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    firebase: Option<ProviderClaims>,
}

#[derive(Debug, Deserialize)]
struct ProviderClaims {
    #[serde(default)]
    sign_in_provider: Option<String>,
}

/// Verify a session cookie against the provider's key set
///
/// Checks, in order: structure, algorithm, key id, signature, audience,
/// issuer, subject, `iat`, `exp`.
pub fn verify_session_jwt(
    token: &str,
    keys: &KeySet,
    project_id: &str,
    now: i64,
) -> Result<SessionClaims, SessionRejection> {
    let mut parts = token.split('.');
    let (Some(header_b64), Some(claims_b64), Some(sig_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(SessionRejection::Malformed);
    };

    let header: JwtHeader = decode_segment(header_b64)?;
    if header.alg != ALGORITHM {
        return Err(SessionRejection::UnsupportedAlgorithm(header.alg));
    }

    let kid = header.kid.unwrap_or_default();
    let public_key = keys
        .get(&kid)
        .ok_or_else(|| SessionRejection::UnknownKeyId(kid.clone()))?;

    let signature_bytes = from_base64_url(sig_b64).map_err(|_| SessionRejection::Malformed)?;
    let signature = Signature::try_from(signature_bytes.as_slice())
        .map_err(|_| SessionRejection::InvalidSignature)?;
    VerifyingKey::<Sha256>::new(public_key.clone())
        .verify(format!("{header_b64}.{claims_b64}").as_bytes(), &signature)
        .map_err(|_| SessionRejection::InvalidSignature)?;

    let raw: RawSessionClaims = decode_segment(claims_b64)?;

    if raw.aud != project_id {
        return Err(SessionRejection::InvalidAudience(raw.aud));
    }
    if raw.iss != session_issuer(project_id) {
        return Err(SessionRejection::InvalidIssuer(raw.iss));
    }
    if raw.sub.is_empty() || raw.sub.chars().count() > MAX_SUBJECT_LEN {
        return Err(SessionRejection::InvalidSubject);
    }
    if raw.iat > now + CLOCK_SKEW_SECS {
        return Err(SessionRejection::IssuedInFuture);
    }
    if raw.auth_time.is_some_and(|t| t > now + CLOCK_SKEW_SECS) {
        return Err(SessionRejection::AuthenticatedInFuture);
    }
    if raw.exp <= now {
        return Err(SessionRejection::Expired);
    }

    Ok(SessionClaims {
        uid: raw.sub,
        email: raw.email,
        email_verified: raw.email_verified.unwrap_or(false),
        auth_time: raw.auth_time.unwrap_or(raw.iat),
        issued_at: raw.iat,
        expires_at: raw.exp,
        issuer: raw.iss,
        audience: raw.aud,
        sign_in_provider: raw.firebase.and_then(|f| f.sign_in_provider),
    })
}
