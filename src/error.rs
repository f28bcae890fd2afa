//! Common errors
//!
//! Every failure is surfaced immediately to the caller with the offending
//! value or the underlying source error attached. Nothing is retried or
//! recovered internally.

#![allow(missing_copy_implementations)]

use std::error::Error as StdError;

use aliri_clock::UnixTime;
use thiserror::Error;

use crate::jwt;

/// The key cannot be used with the requested algorithm
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("key incompatible with algorithm '{alg}'")]
pub struct IncompatibleAlgorithm {
    alg: crate::jwa::Algorithm,
}

#[inline]
pub(crate) fn incompatible_algorithm(alg: crate::jwa::Algorithm) -> IncompatibleAlgorithm {
    IncompatibleAlgorithm { alg }
}

/// The provided name could not be matched with supported algorithms
///
/// The two variants distinguish which half of the identifier failed to
/// resolve: the trailing digit group or the leading family letters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum UnknownAlgorithm {
    /// The digit group is not one of 256, 384, or 512
    #[error("'{0}' does not use a supported hash size")]
    UnsupportedHash(String),

    /// The family letters are not one of HS, RS, PS, or ES
    #[error("'{0}' does not use a supported algorithm family")]
    UnsupportedFamily(String),
}

#[inline]
pub(crate) fn unsupported_hash(alg: impl Into<String>) -> UnknownAlgorithm {
    UnknownAlgorithm::UnsupportedHash(alg.into())
}

#[inline]
pub(crate) fn unsupported_family(alg: impl Into<String>) -> UnknownAlgorithm {
    UnknownAlgorithm::UnsupportedFamily(alg.into())
}

/// A token segment is not valid URL-safe base64 without padding
#[derive(Debug, Error)]
#[error("segment is not valid URL-safe base64")]
pub struct InvalidEncoding {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn invalid_encoding(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> InvalidEncoding {
    InvalidEncoding {
        source: source.into(),
    }
}

/// The token's algorithm is not in the caller-supplied acceptance set
///
/// This guards against downgrade attacks: a verifier that expects `RS256`
/// must reject a token whose header claims `HS256`, even if that token is
/// cryptographically well-formed under the weaker scheme.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("algorithm '{alg}' is not in the accepted set")]
pub struct AlgorithmNotAccepted {
    alg: crate::jwa::Algorithm,
}

#[inline]
pub(crate) fn algorithm_not_accepted(alg: crate::jwa::Algorithm) -> AlgorithmNotAccepted {
    AlgorithmNotAccepted { alg }
}

/// The JWT is malformed and cannot be split into header, payload, and
/// signature sections
#[derive(Clone, Copy, Debug, Error)]
#[error("malformed JWT")]
pub struct MalformedJwt {
    _p: (),
}

pub(crate) fn malformed_jwt() -> MalformedJwt {
    MalformedJwt { _p: () }
}

/// The JWT header section is malformed
#[derive(Debug, Error)]
#[error("malformed JWT header")]
pub struct MalformedJwtHeader {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jwt_header(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwtHeader {
    MalformedJwtHeader {
        source: source.into(),
    }
}

/// The JWT payload section is malformed
#[derive(Debug, Error)]
#[error("malformed JWT payload")]
pub struct MalformedJwtPayload {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jwt_payload(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwtPayload {
    MalformedJwtPayload {
        source: source.into(),
    }
}

/// The JWT signature section is malformed
#[derive(Debug, Error)]
#[error("malformed JWT signature")]
pub struct MalformedJwtSignature {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jwt_signature(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwtSignature {
    MalformedJwtSignature {
        source: source.into(),
    }
}

/// The signature did not match
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("signature mismatch")]
pub struct SignatureMismatch {
    _p: (),
}

pub(crate) const fn signature_mismatch() -> SignatureMismatch {
    SignatureMismatch { _p: () }
}

/// The key was rejected
#[derive(Debug, Error)]
#[error("key rejected")]
pub struct KeyRejected {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

#[cfg_attr(not(feature = "private-keys"), allow(dead_code))]
pub(crate) fn key_rejected(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> KeyRejected {
    KeyRejected {
        source: source.into(),
    }
}

/// Missing private key
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("cannot sign without a private key")]
pub struct MissingPrivateKey {
    _p: (),
}

pub(crate) const fn missing_private_key() -> MissingPrivateKey {
    MissingPrivateKey { _p: () }
}

/// Unexpected error (possibly a bug)
#[derive(Debug, Error)]
#[error("unexpected error")]
pub struct Unexpected {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn unexpected(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> Unexpected {
    Unexpected {
        source: source.into(),
    }
}

/// An error occurring while creating a signature
#[derive(Debug, Error)]
pub enum SigningError {
    /// The key cannot be used for signing operations
    #[error(transparent)]
    MissingPrivateKey(#[from] MissingPrivateKey),

    /// The key cannot be used with this algorithm
    #[error(transparent)]
    IncompatibleAlgorithm(#[from] IncompatibleAlgorithm),

    /// An unexpected error
    #[error(transparent)]
    Unexpected(#[from] Unexpected),
}

impl From<std::convert::Infallible> for SigningError {
    fn from(_: std::convert::Infallible) -> Self {
        unreachable!("infallible result")
    }
}

/// An error occurring while verifying a signature with a key
#[derive(Debug, Error)]
pub enum KeyVerifyError {
    /// The token's algorithm cannot be used with this key
    #[error(transparent)]
    IncompatibleAlgorithm(#[from] IncompatibleAlgorithm),

    /// Signature is invalid
    #[error(transparent)]
    SignatureMismatch(#[from] SignatureMismatch),

    /// An unexpected error
    #[error(transparent)]
    Unexpected(#[from] Unexpected),
}

impl KeyVerifyError {
    /// Whether the error is due to an incompatible algorithm
    #[must_use]
    pub fn is_incompatible_alg(&self) -> bool {
        matches!(self, Self::IncompatibleAlgorithm(_))
    }

    /// Whether the error is due to a signature mismatch
    #[must_use]
    pub fn is_signature_mismatch(&self) -> bool {
        matches!(self, Self::SignatureMismatch(_))
    }
}

/// An error occurring while signing a JWS payload from pre-encoded segments
#[derive(Debug, Error)]
pub enum JwsSigningError {
    /// A provided segment was not valid URL-safe base64
    #[error(transparent)]
    InvalidEncoding(#[from] InvalidEncoding),

    /// The signature could not be created
    #[error(transparent)]
    SigningError(#[from] SigningError),
}

/// An error occurring while verifying a JWS
///
/// A cryptographically invalid signature is *not* an error at this level:
/// [`jws::verify`][crate::jws::verify] reports it as `Ok(false)`. Errors
/// indicate structurally invalid input or a policy violation.
#[derive(Debug, Error)]
pub enum JwsVerifyError {
    /// The token does not have exactly three segments
    #[error(transparent)]
    MalformedToken(#[from] MalformedJwt),

    /// The token header is malformed
    #[error(transparent)]
    MalformedTokenHeader(#[from] MalformedJwtHeader),

    /// The token signature is malformed
    #[error(transparent)]
    MalformedTokenSignature(#[from] MalformedJwtSignature),

    /// The token's algorithm does not match supported algorithms
    #[error(transparent)]
    UnknownAlgorithm(#[from] UnknownAlgorithm),

    /// The token's algorithm is not in the caller's acceptance set
    #[error(transparent)]
    AlgorithmNotAccepted(#[from] AlgorithmNotAccepted),

    /// The token was rejected by the key
    #[error("token rejected by key")]
    Key(#[from] KeyVerifyError),
}

/// An error occurring while verifying a JWT
///
/// Unlike [`JwsVerifyError`], every failure mode here is an error,
/// including a bad signature: by the time signature checking runs, all
/// claim and policy checks have already passed, so a failure at that point
/// is worth reporting distinctly.
#[derive(Debug, Error)]
pub enum JwtVerifyError {
    /// The JWT is malformed, without a discernible header, payload, and signature
    #[error(transparent)]
    MalformedToken(#[from] MalformedJwt),

    /// The JWT header is malformed
    #[error(transparent)]
    MalformedTokenHeader(#[from] MalformedJwtHeader),

    /// The JWT payload is malformed
    #[error(transparent)]
    MalformedTokenPayload(#[from] MalformedJwtPayload),

    /// The JWT signature is malformed
    #[error(transparent)]
    MalformedTokenSignature(#[from] MalformedJwtSignature),

    /// The JWT was rejected by the claims validator
    #[error("token rejected by claims validator")]
    ClaimsRejected(#[from] ClaimsRejected),

    /// The JWT signature could not be verified
    #[error("token signature is invalid")]
    SignatureInvalid(#[source] JwsVerifyError),
}

/// An error occurring while signing a JWT from header and claims objects
#[derive(Debug, Error)]
pub enum JwtSigningError {
    /// The signature could not be created
    #[error(transparent)]
    SigningError(#[from] SigningError),

    /// The JWT header could not be serialized
    #[error(transparent)]
    MalformedJwtHeader(#[from] MalformedJwtHeader),

    /// The JWT payload could not be serialized
    #[error(transparent)]
    MalformedJwtPayload(#[from] MalformedJwtPayload),
}

/// An error occurring when validating the claims of a JWT
///
/// Each variant carries the offending value found in the token, where one
/// exists, so that a rejection can be diagnosed without re-running the
/// verification.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClaimsRejected {
    /// The token algorithm is not in the approved set
    #[error("algorithm '{0}' is not approved")]
    AlgorithmNotAccepted(crate::jwa::Algorithm),

    /// The token type header is not `JWT`
    #[error("token type {0:?} is not acceptable")]
    WrongTokenType(Option<String>),

    /// The token issuer is not in the allowed set
    #[error("issuer {0:?} is not acceptable")]
    IssuerNotAccepted(Option<jwt::Issuer>),

    /// The token subject is not in the allowed set
    #[error("subject {0:?} is not acceptable")]
    SubjectNotAccepted(Option<jwt::Subject>),

    /// None of the token audiences is in the allowed set
    #[error("audiences {0:?} are not acceptable")]
    AudienceNotAccepted(jwt::Audiences),

    /// The token ID does not match the expected token ID
    #[error("token ID {0:?} is not acceptable")]
    TokenIdNotAccepted(jwt::TokenId),

    /// The token is expired according to the `exp` claim
    #[error("token expired at {0:?}")]
    TokenExpired(UnixTime),

    /// The token is not yet valid according to the `nbf` claim
    #[error("token not valid before {0:?}")]
    TokenNotYetValid(UnixTime),
}
