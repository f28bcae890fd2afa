use crate::{error, jwa, jws};

/// A signing and verification key of any supported family
///
/// This type erases the concrete key family so that callers can hold a
/// heterogeneous set of keys behind one type. Family and algorithm
/// compatibility is still enforced by the underlying key: handing an
/// HMAC secret an `RS256` token fails with an incompatibility error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
#[must_use]
pub enum Key {
    /// An HMAC shared secret
    #[cfg(feature = "hmac")]
    #[cfg_attr(docsrs, doc(cfg(feature = "hmac")))]
    Hmac(jwa::Hmac),

    /// An RSA public key, possibly with its private components
    #[cfg(feature = "rsa")]
    #[cfg_attr(docsrs, doc(cfg(feature = "rsa")))]
    Rsa(jwa::Rsa),

    /// An ECC public key, possibly with its private components
    #[cfg(feature = "ec")]
    #[cfg_attr(docsrs, doc(cfg(feature = "ec")))]
    EllipticCurve(jwa::EllipticCurve),
}

impl Key {
    /// Strips any private key components, leaving only the public key
    ///
    /// HMAC secrets are symmetric and are returned unchanged.
    pub fn public_only(self) -> Self {
        match self {
            #[cfg(feature = "hmac")]
            Self::Hmac(k) => Self::Hmac(k),
            #[cfg(feature = "rsa")]
            Self::Rsa(k) => Self::Rsa(k.public_only()),
            #[cfg(feature = "ec")]
            Self::EllipticCurve(k) => Self::EllipticCurve(k.public_only()),
        }
    }
}

#[cfg(feature = "hmac")]
#[cfg_attr(docsrs, doc(cfg(feature = "hmac")))]
impl From<jwa::Hmac> for Key {
    fn from(key: jwa::Hmac) -> Self {
        Self::Hmac(key)
    }
}

#[cfg(feature = "rsa")]
#[cfg_attr(docsrs, doc(cfg(feature = "rsa")))]
impl From<jwa::Rsa> for Key {
    fn from(key: jwa::Rsa) -> Self {
        Self::Rsa(key)
    }
}

#[cfg(feature = "ec")]
#[cfg_attr(docsrs, doc(cfg(feature = "ec")))]
impl From<jwa::EllipticCurve> for Key {
    fn from(key: jwa::EllipticCurve) -> Self {
        Self::EllipticCurve(key)
    }
}

impl jws::Signer for Key {
    type Error = error::SigningError;

    fn can_sign(&self, alg: jwa::Algorithm) -> bool {
        match self {
            #[cfg(feature = "hmac")]
            Self::Hmac(k) => k.can_sign(alg),
            #[cfg(feature = "rsa")]
            Self::Rsa(k) => k.can_sign(alg),
            #[cfg(feature = "ec")]
            Self::EllipticCurve(k) => k.can_sign(alg),
        }
    }

    fn sign(&self, alg: jwa::Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        match self {
            #[cfg(feature = "hmac")]
            Self::Hmac(k) => k.sign(alg, data),
            #[cfg(feature = "rsa")]
            Self::Rsa(k) => k.sign(alg, data),
            #[cfg(feature = "ec")]
            Self::EllipticCurve(k) => k.sign(alg, data),
        }
    }
}

impl jws::Verifier for Key {
    type Error = error::KeyVerifyError;

    fn can_verify(&self, alg: jwa::Algorithm) -> bool {
        match self {
            #[cfg(feature = "hmac")]
            Self::Hmac(k) => k.can_verify(alg),
            #[cfg(feature = "rsa")]
            Self::Rsa(k) => k.can_verify(alg),
            #[cfg(feature = "ec")]
            Self::EllipticCurve(k) => k.can_verify(alg),
        }
    }

    fn verify(
        &self,
        alg: jwa::Algorithm,
        data: &[u8],
        signature: &[u8],
    ) -> Result<(), Self::Error> {
        match self {
            #[cfg(feature = "hmac")]
            Self::Hmac(k) => k.verify(alg, data, signature),
            #[cfg(feature = "rsa")]
            Self::Rsa(k) => k.verify(alg, data, signature),
            #[cfg(feature = "ec")]
            Self::EllipticCurve(k) => k.verify(alg, data, signature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jws::Verifier;

    #[cfg(feature = "hmac")]
    #[test]
    fn key_enforces_family_of_inner_key() {
        let key = Key::from(jwa::Hmac::generate(jwa::Algorithm::HS256).unwrap());
        assert!(key.can_verify(jwa::Algorithm::HS512));
        assert!(!key.can_verify(jwa::Algorithm::RS256));

        let err = key
            .verify(jwa::Algorithm::RS256, b"data", b"sig")
            .unwrap_err();
        assert!(err.is_incompatible_alg());
    }
}
