//! Signing algorithm identifiers and resolution
//!
//! The identifiers follow the JSON Web Algorithms (JWA) standard,
//! [RFC7518][]. An identifier is two family letters followed by a digit
//! group naming the hash size; the full family × hash-size domain is
//! enumerated by [`Algorithm`], so resolution is a pure, total mapping
//! with no lookup state.
//!
//! [RFC7518]: https://tools.ietf.org/html/rfc7518

use std::{convert::TryFrom, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error;

#[cfg(feature = "ec")]
#[cfg_attr(docsrs, doc(cfg(feature = "ec")))]
pub mod ec;
#[cfg(feature = "hmac")]
#[cfg_attr(docsrs, doc(cfg(feature = "hmac")))]
pub mod hmac;
#[cfg(feature = "rsa")]
#[cfg_attr(docsrs, doc(cfg(feature = "rsa")))]
pub mod rsa;

#[cfg(feature = "ec")]
#[cfg_attr(docsrs, doc(cfg(feature = "ec")))]
#[doc(inline)]
pub use ec::EllipticCurve;
#[cfg(feature = "hmac")]
#[cfg_attr(docsrs, doc(cfg(feature = "hmac")))]
#[doc(inline)]
pub use hmac::Hmac;
#[cfg(feature = "rsa")]
#[cfg_attr(docsrs, doc(cfg(feature = "rsa")))]
#[doc(inline)]
pub use rsa::Rsa;

/// A signature scheme family
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Family {
    /// HMAC symmetric signatures
    Hmac,

    /// RSA signatures using PKCS#1 v1.5 padding
    RsaPkcs1,

    /// RSA signatures using PSS padding (MGF1)
    RsaPss,

    /// ECDSA signatures over a NIST prime curve
    Ecdsa,
}

/// A named elliptic curve
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    /// The P-256 curve (prime256v1/secp256r1)
    #[serde(rename = "P-256")]
    P256,

    /// The P-384 curve (secp384r1)
    #[serde(rename = "P-384")]
    P384,

    /// The P-521 curve (secp521r1)
    #[serde(rename = "P-521")]
    P521,
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        };

        f.write_str(s)
    }
}

/// A JWS signing algorithm identifier
///
/// The set of identifiers is the full cross product of the four families
/// (`HS`, `RS`, `PS`, `ES`) and the three hash sizes (256, 384, 512).
/// Identifiers are validated on entry: parsing rejects anything outside
/// this domain before any cryptographic work occurs.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[allow(clippy::upper_case_acronyms)]
pub enum Algorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSA PKCS#1 v1.5 using SHA-256
    RS256,
    /// RSA PKCS#1 v1.5 using SHA-384
    RS384,
    /// RSA PKCS#1 v1.5 using SHA-512
    RS512,
    /// RSA PSS using SHA-256
    PS256,
    /// RSA PSS using SHA-384
    PS384,
    /// RSA PSS using SHA-512
    PS512,
    /// ECDSA over P-256 using SHA-256
    ES256,
    /// ECDSA over P-384 using SHA-384
    ES384,
    /// ECDSA over P-521 using SHA-512
    ES512,
}

impl Algorithm {
    /// The signature scheme family of this algorithm
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::HS256 | Self::HS384 | Self::HS512 => Family::Hmac,
            Self::RS256 | Self::RS384 | Self::RS512 => Family::RsaPkcs1,
            Self::PS256 | Self::PS384 | Self::PS512 => Family::RsaPss,
            Self::ES256 | Self::ES384 | Self::ES512 => Family::Ecdsa,
        }
    }

    /// The size in bits of the hash function used by this algorithm
    #[must_use]
    pub const fn hash_size(self) -> u16 {
        match self {
            Self::HS256 | Self::RS256 | Self::PS256 | Self::ES256 => 256,
            Self::HS384 | Self::RS384 | Self::PS384 | Self::ES384 => 384,
            Self::HS512 | Self::RS512 | Self::PS512 | Self::ES512 => 512,
        }
    }

    /// The elliptic curve used by this algorithm
    ///
    /// `None` for every non-ECDSA family. The mapping is exact:
    /// ES256 → P-256, ES384 → P-384, ES512 → P-521.
    #[must_use]
    pub const fn curve(self) -> Option<Curve> {
        match self {
            Self::ES256 => Some(Curve::P256),
            Self::ES384 => Some(Curve::P384),
            Self::ES512 => Some(Curve::P521),
            _ => None,
        }
    }

    /// The expected output size of the algorithm's signature in bytes
    #[must_use]
    pub const fn signature_size(self) -> usize {
        match self {
            Self::HS256 => 32,
            Self::HS384 => 48,
            Self::HS512 => 64,
            Self::RS256 | Self::RS384 | Self::RS512 => 256,
            Self::PS256 | Self::PS384 | Self::PS512 => 256,
            Self::ES256 => 64,
            Self::ES384 => 96,
            Self::ES512 => 132,
        }
    }

    /// The legacy JCA-style name of the combined signature scheme
    ///
    /// This naming convention is a contract with external verifiers: the
    /// HMAC family places the hash name after the scheme keyword
    /// (`hmacSHA256`), while every other family places the hash name
    /// before it (`SHA256withRSA`, `SHA256withRSAandMGF1`,
    /// `SHA256withECDSA`).
    #[must_use]
    pub const fn scheme_name(self) -> &'static str {
        match self {
            Self::HS256 => "hmacSHA256",
            Self::HS384 => "hmacSHA384",
            Self::HS512 => "hmacSHA512",
            Self::RS256 => "SHA256withRSA",
            Self::RS384 => "SHA384withRSA",
            Self::RS512 => "SHA512withRSA",
            Self::PS256 => "SHA256withRSAandMGF1",
            Self::PS384 => "SHA384withRSAandMGF1",
            Self::PS512 => "SHA512withRSAandMGF1",
            Self::ES256 => "SHA256withECDSA",
            Self::ES384 => "SHA384withECDSA",
            Self::ES512 => "SHA512withECDSA",
        }
    }

    /// The canonical identifier, as it appears in a token header
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&'_ str> for Algorithm {
    type Error = error::UnknownAlgorithm;

    fn try_from(value: &'_ str) -> Result<Self, Self::Error> {
        let hash = match value.get(2..) {
            Some(h @ "256") | Some(h @ "384") | Some(h @ "512") => h,
            _ => return Err(error::unsupported_hash(value)),
        };

        match (&value[..2], hash) {
            ("HS", "256") => Ok(Self::HS256),
            ("HS", "384") => Ok(Self::HS384),
            ("HS", "512") => Ok(Self::HS512),
            ("RS", "256") => Ok(Self::RS256),
            ("RS", "384") => Ok(Self::RS384),
            ("RS", "512") => Ok(Self::RS512),
            ("PS", "256") => Ok(Self::PS256),
            ("PS", "384") => Ok(Self::PS384),
            ("PS", "512") => Ok(Self::PS512),
            ("ES", "256") => Ok(Self::ES256),
            ("ES", "384") => Ok(Self::ES384),
            ("ES", "512") => Ok(Self::ES512),
            _ => Err(error::unsupported_family(value)),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = error::UnknownAlgorithm;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = error::UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnknownAlgorithm;

    const ALL: [Algorithm; 12] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::PS256,
        Algorithm::PS384,
        Algorithm::PS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::ES512,
    ];

    #[test]
    fn resolves_every_identifier() {
        for &alg in &ALL {
            assert_eq!(alg.as_str().parse::<Algorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn rejects_unsupported_hash() {
        // "EdDSA" fails on the hash group: "DSA" is not a supported size
        for bad in &["HS128", "RS25", "ES", "PS5121", "EdDSA", ""] {
            match bad.parse::<Algorithm>() {
                Err(UnknownAlgorithm::UnsupportedHash(alg)) => assert_eq!(&alg, bad),
                other => panic!("expected unsupported hash for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn rejects_unsupported_family() {
        for bad in &["XX256", "hs256", "XY512"] {
            match bad.parse::<Algorithm>() {
                Err(UnknownAlgorithm::UnsupportedFamily(alg)) => assert_eq!(&alg, bad),
                other => panic!(
                    "expected unsupported family for {:?}, got {:?}",
                    bad, other
                ),
            }
        }
    }

    #[test]
    fn curve_mapping_is_exact() {
        assert_eq!(Algorithm::ES256.curve(), Some(Curve::P256));
        assert_eq!(Algorithm::ES384.curve(), Some(Curve::P384));
        assert_eq!(Algorithm::ES512.curve(), Some(Curve::P521));

        for &alg in &ALL {
            if alg.family() != Family::Ecdsa {
                assert_eq!(alg.curve(), None);
            }
        }
    }

    #[test]
    fn scheme_names_follow_the_interop_convention() {
        assert_eq!(Algorithm::HS256.scheme_name(), "hmacSHA256");
        assert_eq!(Algorithm::HS512.scheme_name(), "hmacSHA512");
        assert_eq!(Algorithm::RS256.scheme_name(), "SHA256withRSA");
        assert_eq!(Algorithm::PS384.scheme_name(), "SHA384withRSAandMGF1");
        assert_eq!(Algorithm::ES512.scheme_name(), "SHA512withECDSA");

        for &alg in &ALL {
            let hash = format!("SHA{}", alg.hash_size());
            if alg.family() == Family::Hmac {
                assert!(alg.scheme_name().ends_with(&hash));
            } else {
                assert!(alg.scheme_name().starts_with(&hash));
            }
        }
    }

    #[test]
    fn serializes_as_the_canonical_identifier() {
        assert_eq!(
            serde_json::to_string(&Algorithm::ES384).unwrap(),
            r#""ES384""#
        );
        let alg: Algorithm = serde_json::from_str(r#""PS512""#).unwrap();
        assert_eq!(alg, Algorithm::PS512);
        assert!(serde_json::from_str::<Algorithm>(r#""none""#).is_err());
    }
}
