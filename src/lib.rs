//! This crate issues and verifies compact, signed security tokens following
//! the JSON Web Signature (JWS) and JSON Web Token (JWT) conventions:
//!
//! * JSON Web Signature (JWS): [RFC7515][]
//! * JSON Web Algorithms (JWA): [RFC7518][]
//! * JSON Web Token (JWT): [RFC7519][]
//!
//! A producer attaches a cryptographic signature to a JSON header and
//! payload, and a verifier checks that signature plus a set of standard
//! token claims (issuer, subject, audience, expiry, not-before, token ID)
//! before trusting the token's contents.
//!
//! Token encryption (JWE, [RFC7516][]) and JWK document handling
//! ([RFC7517][]) are not supported.
//!
//! [RFC7515]: https://tools.ietf.org/html/rfc7515
//! [RFC7516]: https://tools.ietf.org/html/rfc7516
//! [RFC7517]: https://tools.ietf.org/html/rfc7517
//! [RFC7518]: https://tools.ietf.org/html/rfc7518
//! [RFC7519]: https://tools.ietf.org/html/rfc7519
//!
//! # Example
//!
//! ```
//! use aliri_base64::Base64UrlRef;
//! use aliri_clock::UnixTime;
//! use signet::jwt::CoreClaims;
//! use signet::{jwa, jwt, Key};
//!
//! let secret = Base64UrlRef::from_slice(b"test").to_owned();
//! let key = Key::from(jwa::Hmac::new(secret));
//!
//! let claims = jwt::BasicClaims::new()
//!     .with_issuer(jwt::Issuer::from_static("authority"))
//!     .with_audience(jwt::Audience::from_static("my_api"))
//!     .with_expiration(UnixTime(2_000_000_000));
//!
//! let headers = jwt::BasicHeaders::new(jwa::Algorithm::HS256);
//! let token = claims.sign(&key, &headers).unwrap();
//!
//! let validator = jwt::Validator::new(vec![jwa::Algorithm::HS256])
//!     .add_allowed_issuer(jwt::Issuer::from_static("authority"))
//!     .add_allowed_audience(jwt::Audience::from_static("my_api"))
//!     .verify_at(UnixTime(1_700_000_000));
//!
//! let validated: jwt::Validated = token.verify(&key, &validator).unwrap();
//! assert_eq!(validated.claims().iss().unwrap().as_str(), "authority");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_must_use
)]

pub mod error;
pub mod jwa;
pub mod jws;
pub mod jwt;
mod key;

#[doc(inline)]
pub use jwa::Algorithm;
#[doc(inline)]
pub use jwt::{Jwt, JwtRef};
#[doc(inline)]
pub use key::Key;
