//! Implementations of the JSON Web Signature (JWS) standard
//!
//! The specifications for this standard can be found in [RFC7515][].
//!
//! Tokens are handled in their compact serialization: three URL-safe
//! base64 segments joined by `.` separators. The signing input is always
//! the already-encoded header and payload text, never the decoded bytes.
//!
//! [RFC7515]: https://tools.ietf.org/html/rfc7515

use std::{convert::TryFrom, error::Error as StdError, fmt, fmt::Write};

use aliri_base64::Base64Url;
use serde::Deserialize;

use crate::{error, jwa, jwt};

/// A JWS signer
pub trait Signer {
    /// The error returned on failure to sign
    type Error: fmt::Debug + fmt::Display + Sync + Send + 'static;

    /// Whether the specific algorithm provided is compatible
    /// with this signer
    fn can_sign(&self, alg: jwa::Algorithm) -> bool;

    /// Attempts to sign the data provided using the specified algorithm
    fn sign(&self, alg: jwa::Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error>;
}

/// A JWS verifier
pub trait Verifier {
    /// The error returned on a failure to verify
    type Error: StdError + Send + Sync + 'static;

    /// Whether the specific algorithm provided is compatible
    /// with this verifier
    fn can_verify(&self, alg: jwa::Algorithm) -> bool;

    /// Attempts to verify the data against the signature using the
    /// specified algorithm
    fn verify(
        &self,
        alg: jwa::Algorithm,
        data: &[u8],
        signature: &[u8],
    ) -> Result<(), Self::Error>;
}

/// Splits a compact token into its three segments
///
/// The split is strict: exactly two `.` separators must be present.
/// Empty segments are tolerated here and rejected later by segment
/// decoding, matching how the segments are consumed.
///
/// # Errors
///
/// The token does not have exactly three segments.
pub fn split(token: &str) -> Result<(&str, &str, &str), error::MalformedJwt> {
    let mut segments = token.split('.');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(h), Some(p), Some(s), None) => Ok((h, p, s)),
        _ => Err(error::malformed_jwt()),
    }
}

/// Assembles a compact token from pre-encoded segments and a raw signature
///
/// The header and payload must already be URL-safe base64 text; the
/// signature is raw bytes and is encoded here.
///
/// # Errors
///
/// The header or payload segment is not valid URL-safe base64.
pub fn assemble(
    header: &str,
    payload: &str,
    signature: &[u8],
) -> Result<jwt::Jwt, error::InvalidEncoding> {
    check_segment(header)?;
    check_segment(payload)?;

    let signature = Base64Url::from_raw(signature.to_vec());

    let expected_len = header.len() + payload.len() + signature.encoded_len() + 2;
    let mut token = String::with_capacity(expected_len);
    write!(token, "{}.{}.{}", header, payload, signature)
        .expect("writes to strings never fail");

    debug_assert_eq!(expected_len, token.len());

    Ok(jwt::Jwt::new(token))
}

/// Signs pre-encoded header and payload segments, producing a compact token
///
/// # Errors
///
/// The header or payload segment is not valid URL-safe base64, or the
/// key could not produce a signature with the requested algorithm.
pub fn sign<S>(
    alg: jwa::Algorithm,
    key: &S,
    header: &str,
    payload: &str,
) -> Result<jwt::Jwt, error::JwsSigningError>
where
    S: Signer + ?Sized,
    S::Error: Into<error::SigningError>,
{
    check_segment(header)?;
    check_segment(payload)?;

    // Capacity only; RSA keys above 2048 bits sign wider than the
    // algorithm's nominal signature size.
    let capacity = header.len()
        + payload.len()
        + Base64Url::calc_encoded_len(alg.signature_size())
        + 2;

    let mut message = String::with_capacity(capacity);
    write!(message, "{}.{}", header, payload).expect("writes to strings never fail");

    let signature = key
        .sign(alg, message.as_bytes())
        .map_err(|e| error::JwsSigningError::SigningError(e.into()))?;
    let signature = Base64Url::from_raw(signature);

    let mut token = message;
    write!(token, ".{}", signature).expect("writes to strings never fail");

    Ok(jwt::Jwt::new(token))
}

fn check_segment(segment: &str) -> Result<(), error::InvalidEncoding> {
    Base64Url::from_encoded(segment)
        .map(|_| ())
        .map_err(error::invalid_encoding)
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Verifies a compact token's signature against the given key
///
/// When `approved` is provided, the token's declared algorithm must be a
/// member of the slice. Verification never trusts the header's algorithm
/// beyond selecting among algorithms the caller and key already accept.
///
/// A structurally valid token whose signature simply does not match
/// yields `Ok(false)`. Errors are reserved for tokens that could not be
/// checked at all or that failed policy.
///
/// # Errors
///
/// The token is structurally invalid, names an unknown algorithm, names
/// an algorithm outside the approved set, or the key could not process
/// the requested algorithm.
pub fn verify<V>(
    token: &jwt::JwtRef,
    key: &V,
    approved: Option<&[jwa::Algorithm]>,
) -> Result<bool, error::JwsVerifyError>
where
    V: Verifier + ?Sized,
    V::Error: Into<error::KeyVerifyError>,
{
    let (raw_header, raw_payload, raw_signature) = split(token.as_str())?;

    let header_bytes = Base64Url::from_encoded(raw_header).map_err(error::malformed_jwt_header)?;
    let header: RawHeader =
        serde_json::from_slice(header_bytes.as_slice()).map_err(error::malformed_jwt_header)?;

    let alg = jwa::Algorithm::try_from(header.alg.as_str())?;

    if let Some(approved) = approved {
        if !approved.contains(&alg) {
            return Err(error::algorithm_not_accepted(alg).into());
        }
    }

    let message = &token.as_str()[..raw_header.len() + 1 + raw_payload.len()];
    let signature =
        Base64Url::from_encoded(raw_signature).map_err(error::malformed_jwt_signature)?;

    match key.verify(alg, message.as_bytes(), signature.as_slice()) {
        Ok(()) => Ok(true),
        Err(err) => match err.into() {
            error::KeyVerifyError::SignatureMismatch(_) => Ok(false),
            other => Err(error::JwsVerifyError::Key(other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{jwa::Algorithm, jwt::JwtRef};

    const TEST_SECRET: &str = "AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow";
    const TEST_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.JC4wMg.5mvfOroL-g7HyqJoozehmsaqmvTYGEq5jTI1gVvoEoQ";

    #[cfg(feature = "hmac")]
    fn test_key() -> crate::jwa::Hmac {
        crate::jwa::Hmac::new(Base64Url::from_encoded(TEST_SECRET).unwrap())
    }

    #[test]
    #[cfg(feature = "hmac")]
    fn verifies_known_hmac_token() {
        let token = JwtRef::from_str(TEST_TOKEN);
        let valid = verify(token, &test_key(), Some(&[Algorithm::HS256])).unwrap();
        assert!(valid);
    }

    #[test]
    #[cfg(feature = "hmac")]
    fn tampered_payload_fails_without_error() {
        let tampered = TEST_TOKEN.replace(".JC4wMg.", ".JC4wMw.");
        let token = JwtRef::from_str(&tampered);
        let valid = verify(token, &test_key(), Some(&[Algorithm::HS256])).unwrap();
        assert!(!valid);
    }

    #[test]
    #[cfg(feature = "hmac")]
    fn rejects_algorithm_outside_approved_set() {
        let token = JwtRef::from_str(TEST_TOKEN);
        let err = verify(token, &test_key(), Some(&[Algorithm::RS256])).unwrap_err();
        assert!(matches!(err, error::JwsVerifyError::AlgorithmNotAccepted(_)));
    }

    #[test]
    #[cfg(feature = "hmac")]
    fn rejects_unknown_algorithm_name() {
        // { "alg": "none" }
        let token = JwtRef::from_str("eyJhbGciOiJub25lIn0.JC4wMg.");
        let err = verify(token, &test_key(), None).unwrap_err();
        assert!(matches!(err, error::JwsVerifyError::UnknownAlgorithm(_)));
    }

    #[test]
    fn split_requires_exactly_three_segments() {
        assert!(split("a.b").is_err());
        assert!(split("a.b.c.d").is_err());
        assert!(split("").is_err());

        let (h, p, s) = split("a.b.c").unwrap();
        assert_eq!((h, p, s), ("a", "b", "c"));
    }

    #[test]
    #[cfg(feature = "hmac")]
    fn sign_produces_verifiable_token() {
        let key = test_key();
        let token = sign(Algorithm::HS256, &key, "eyJhbGciOiJIUzI1NiJ9", "JC4wMg").unwrap();
        assert_eq!(token.as_str(), TEST_TOKEN);

        let valid = verify(&token, &key, None).unwrap();
        assert!(valid);
    }

    #[test]
    #[cfg(feature = "hmac")]
    fn sign_rejects_segments_that_are_not_base64url() {
        let err = sign(Algorithm::HS256, &test_key(), "not+base64url", "JC4wMg").unwrap_err();
        assert!(matches!(err, error::JwsSigningError::InvalidEncoding(_)));
    }

    #[test]
    fn assemble_round_trips_through_split() {
        let token = assemble("eyJhbGciOiJIUzI1NiJ9", "JC4wMg", &[1, 2, 3]).unwrap();
        let (h, p, s) = split(token.as_str()).unwrap();
        assert_eq!(h, "eyJhbGciOiJIUzI1NiJ9");
        assert_eq!(p, "JC4wMg");
        assert_eq!(s, "AQID");
    }

    #[test]
    fn assemble_rejects_segments_that_are_not_base64url() {
        assert!(assemble("not+base64url", "JC4wMg", &[1, 2, 3]).is_err());
        assert!(assemble("JC4wMg", "not/base64url", &[1, 2, 3]).is_err());
    }

    #[test]
    #[cfg(all(feature = "rsa", feature = "private-keys"))]
    fn signs_with_a_key_wider_than_the_nominal_signature_size() {
        let key =
            crate::jwa::Rsa::private_key_from_pem(include_str!("../data/rsa_4096.pem")).unwrap();

        // { "alg": "RS256" }
        let token = sign(Algorithm::RS256, &key, "eyJhbGciOiJSUzI1NiJ9", "JC4wMg").unwrap();
        let (_, _, s) = split(token.as_str()).unwrap();
        assert_eq!(s.len(), Base64Url::calc_encoded_len(512));

        let valid = verify(&token, &key, Some(&[Algorithm::RS256])).unwrap();
        assert!(valid);
    }
}
