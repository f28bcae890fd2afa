//! ECDSA signing keys
//!
//! Verification and signing are backed by `ring`, which supports the
//! P-256 and P-384 curves. P-521 keys are representable in the algorithm
//! domain but cannot be used for cryptographic operations with the
//! current backend; attempting to do so fails with an explicit error
//! rather than panicking.

use crate::{
    error,
    jwa::{Algorithm, Family},
    jws,
};

#[doc(inline)]
pub use crate::jwa::Curve;

#[cfg(feature = "private-keys")]
mod private;
mod public;

#[cfg(feature = "private-keys")]
#[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
pub use private::PrivateKey;
pub use public::PublicKey;

/// Elliptic curve cryptography key
#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub struct EllipticCurve {
    #[cfg(feature = "private-keys")]
    key: MaybePrivate,

    #[cfg(not(feature = "private-keys"))]
    key: PublicKey,
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg(feature = "private-keys")]
enum MaybePrivate {
    PublicAndPrivate(PrivateKey),
    PublicOnly(PublicKey),
}

impl EllipticCurve {
    /// Generates a newly minted key pair using the specified curve
    ///
    /// # Errors
    ///
    /// Unable to generate a key pair for the curve.
    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    pub fn generate(curve: Curve) -> Result<Self, error::Unexpected> {
        let private_key = PrivateKey::generate(curve)?;

        Ok(Self::from(private_key))
    }

    /// Constructs a private key from a PEM file
    ///
    /// # Errors
    ///
    /// The provided PEM file is not a valid ECC private key.
    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    pub fn private_key_from_pem(pem: &str) -> Result<Self, error::KeyRejected> {
        let private_key = PrivateKey::from_pem(pem)?;

        Ok(Self::from(private_key))
    }

    /// Constructs a public key from a PEM file
    ///
    /// # Errors
    ///
    /// The provided PEM file is not a valid ECC public key.
    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    pub fn public_key_from_pem(pem: &str) -> Result<Self, error::KeyRejected> {
        let public_key = PublicKey::from_pem(pem)?;

        Ok(Self::from(public_key))
    }

    /// Constructs a public key from the curve and affine coordinates
    ///
    /// # Errors
    ///
    /// The coordinates do not fit the field of the named curve.
    pub fn from_public_components(
        curve: Curve,
        x: impl Into<aliri_base64::Base64Url>,
        y: impl Into<aliri_base64::Base64Url>,
    ) -> Result<Self, error::KeyRejected> {
        let public_key = PublicKey::from_components(curve, x, y)?;

        Ok(Self::from(public_key))
    }

    #[cfg(feature = "private-keys")]
    pub(crate) fn private_key(&self) -> Option<&PrivateKey> {
        match &self.key {
            MaybePrivate::PublicAndPrivate(p) => Some(p),
            MaybePrivate::PublicOnly(_) => None,
        }
    }

    #[cfg(feature = "private-keys")]
    pub(crate) fn public_key(&self) -> &PublicKey {
        match &self.key {
            MaybePrivate::PublicAndPrivate(p) => p.public_key(),
            MaybePrivate::PublicOnly(p) => p,
        }
    }

    #[cfg(not(feature = "private-keys"))]
    pub(crate) fn public_key(&self) -> &PublicKey {
        &self.key
    }

    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    /// Removes the private key components
    pub fn public_only(self) -> Self {
        match self.key {
            MaybePrivate::PublicAndPrivate(p) => Self::from(p.into_public_key()),
            MaybePrivate::PublicOnly(_) => self,
        }
    }

    #[cfg(not(feature = "private-keys"))]
    /// Removes the private key components
    pub fn public_only(self) -> Self {
        self
    }
}

fn verification_algorithm(
    curve: Curve,
) -> Result<&'static ring::signature::EcdsaVerificationAlgorithm, error::Unexpected> {
    match curve {
        Curve::P256 => Ok(&ring::signature::ECDSA_P256_SHA256_FIXED),
        Curve::P384 => Ok(&ring::signature::ECDSA_P384_SHA384_FIXED),
        Curve::P521 => Err(error::unexpected(
            "ECDSA over P-521 is not supported by the cryptographic backend",
        )),
    }
}

#[cfg(feature = "private-keys")]
fn signing_algorithm(
    curve: Curve,
) -> Result<&'static ring::signature::EcdsaSigningAlgorithm, error::Unexpected> {
    match curve {
        Curve::P256 => Ok(&ring::signature::ECDSA_P256_SHA256_FIXED_SIGNING),
        Curve::P384 => Ok(&ring::signature::ECDSA_P384_SHA384_FIXED_SIGNING),
        Curve::P521 => Err(error::unexpected(
            "ECDSA over P-521 is not supported by the cryptographic backend",
        )),
    }
}

impl jws::Verifier for EllipticCurve {
    type Error = error::KeyVerifyError;

    fn can_verify(&self, alg: Algorithm) -> bool {
        self.public_key().can_verify(alg)
    }

    fn verify(&self, alg: Algorithm, data: &[u8], signature: &[u8]) -> Result<(), Self::Error> {
        self.public_key().verify(alg, data, signature)
    }
}

#[cfg(feature = "private-keys")]
impl jws::Signer for EllipticCurve {
    type Error = error::SigningError;

    fn can_sign(&self, alg: Algorithm) -> bool {
        if let Some(p) = self.private_key() {
            p.can_sign(alg)
        } else {
            false
        }
    }

    fn sign(&self, alg: Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        if let Some(p) = self.private_key() {
            p.sign(alg, data)
        } else {
            Err(error::missing_private_key().into())
        }
    }
}

#[cfg(not(feature = "private-keys"))]
impl jws::Signer for EllipticCurve {
    type Error = error::SigningError;

    fn can_sign(&self, _alg: Algorithm) -> bool {
        false
    }

    fn sign(&self, _alg: Algorithm, _data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        Err(error::missing_private_key().into())
    }
}

const fn is_ec_family(alg: Algorithm) -> bool {
    matches!(alg.family(), Family::Ecdsa)
}

fn coordinate_size(curve: Curve) -> usize {
    match curve {
        Curve::P256 => 32,
        Curve::P384 => 48,
        Curve::P521 => 66,
    }
}

#[cfg(feature = "private-keys")]
mod groups {
    use once_cell::sync::Lazy;
    use openssl::{
        ec::{EcGroup, EcGroupRef},
        nid::Nid,
    };

    use super::Curve;

    static P256: Lazy<EcGroup> =
        Lazy::new(|| EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).expect("known curve"));
    static P384: Lazy<EcGroup> =
        Lazy::new(|| EcGroup::from_curve_name(Nid::SECP384R1).expect("known curve"));
    static P521: Lazy<EcGroup> =
        Lazy::new(|| EcGroup::from_curve_name(Nid::SECP521R1).expect("known curve"));

    pub(super) fn group_for(curve: Curve) -> &'static EcGroupRef {
        match curve {
            Curve::P256 => &P256,
            Curve::P384 => &P384,
            Curve::P521 => &P521,
        }
    }

    pub(super) fn curve_from_group(group: &EcGroupRef) -> Option<Curve> {
        let nid = group.curve_name()?;
        if nid == Nid::X9_62_PRIME256V1 {
            Some(Curve::P256)
        } else if nid == Nid::SECP384R1 {
            Some(Curve::P384)
        } else if nid == Nid::SECP521R1 {
            Some(Curve::P521)
        } else {
            None
        }
    }
}

impl From<PublicKey> for EllipticCurve {
    #[cfg(feature = "private-keys")]
    fn from(key: PublicKey) -> Self {
        Self {
            key: MaybePrivate::PublicOnly(key),
        }
    }

    #[cfg(not(feature = "private-keys"))]
    fn from(key: PublicKey) -> Self {
        Self { key }
    }
}

#[cfg(feature = "private-keys")]
#[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
impl From<PrivateKey> for EllipticCurve {
    fn from(key: PrivateKey) -> Self {
        Self {
            key: MaybePrivate::PublicAndPrivate(key),
        }
    }
}

#[cfg(all(test, feature = "private-keys"))]
mod tests {
    use super::*;
    use crate::jws::{Signer, Verifier};

    const P256_PRIVATE_PEM: &str = include_str!("../../data/ec_p256.pem");
    const P256_PUBLIC_PEM: &str = include_str!("../../data/ec_p256.pub.pem");

    #[test]
    fn private_key_pem_round_trip() {
        let key = EllipticCurve::generate(Curve::P384).unwrap();
        let pem = key.private_key().unwrap().to_pem().unwrap();
        let reimported = EllipticCurve::private_key_from_pem(&pem).unwrap();
        assert_eq!(key, reimported);
    }

    #[test]
    fn imported_public_key_verifies_what_the_private_pem_signs() {
        let signer = EllipticCurve::private_key_from_pem(P256_PRIVATE_PEM).unwrap();
        let verifier = EllipticCurve::public_key_from_pem(P256_PUBLIC_PEM).unwrap();

        assert_eq!(verifier.public_key().curve(), Curve::P256);
        assert_eq!(signer.public_key(), verifier.public_key());

        let signature = signer.sign(Algorithm::ES256, b"sign me").unwrap();
        verifier.verify(Algorithm::ES256, b"sign me", &signature).unwrap();
    }
}
