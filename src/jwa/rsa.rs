//! RSA signing keys (PKCS#1 v1.5 and PSS)

use aliri_base64::Base64Url;

use crate::{
    error,
    jwa::{Algorithm, Family},
    jws,
};

#[cfg(feature = "private-keys")]
mod private;
mod public;

#[cfg(feature = "private-keys")]
#[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
pub use private::PrivateKey;
pub use public::PublicKey;

/// RSA key
#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub struct Rsa {
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

impl Rsa {
    /// Generates a newly minted RSA public/private key pair
    ///
    /// # Errors
    ///
    /// Unable to generate a private key.
    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    pub fn generate() -> Result<Self, error::Unexpected> {
        let private_key = PrivateKey::generate()?;

        Ok(Self::from(private_key))
    }

    /// Constructs a private key from a PEM file
    ///
    /// # Errors
    ///
    /// The provided PEM file is not a valid RSA private key.
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
    /// The provided PEM file is not a valid RSA public key.
    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    pub fn public_key_from_pem(pem: &str) -> Result<Self, error::KeyRejected> {
        let public_key = PublicKey::from_pem(pem)?;

        Ok(Self::from(public_key))
    }

    /// Constructs a public key from the modulus and exponent
    ///
    /// # Errors
    ///
    /// The modulus and exponent were not valid as a public key.
    pub fn from_public_components(
        modulus: impl Into<Base64Url>,
        exponent: impl Into<Base64Url>,
    ) -> Result<Self, error::KeyRejected> {
        let public_key = PublicKey::from_components(modulus, exponent)?;

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
    fn public_key(&self) -> &PublicKey {
        &self.key
    }

    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    /// Removes the private key components, if any
    pub fn public_only(self) -> Self {
        match self.key {
            MaybePrivate::PublicAndPrivate(p) => Self::from(p.into_public_key()),
            MaybePrivate::PublicOnly(_) => self,
        }
    }

    #[cfg(not(feature = "private-keys"))]
    /// Removes the private key components, if any
    pub fn public_only(self) -> Self {
        self
    }
}

fn verification_params(alg: Algorithm) -> Option<&'static ring::signature::RsaParameters> {
    match alg {
        Algorithm::RS256 => Some(&ring::signature::RSA_PKCS1_2048_8192_SHA256),
        Algorithm::RS384 => Some(&ring::signature::RSA_PKCS1_2048_8192_SHA384),
        Algorithm::RS512 => Some(&ring::signature::RSA_PKCS1_2048_8192_SHA512),
        Algorithm::PS256 => Some(&ring::signature::RSA_PSS_2048_8192_SHA256),
        Algorithm::PS384 => Some(&ring::signature::RSA_PSS_2048_8192_SHA384),
        Algorithm::PS512 => Some(&ring::signature::RSA_PSS_2048_8192_SHA512),
        _ => None,
    }
}

#[cfg(feature = "private-keys")]
fn signing_params(alg: Algorithm) -> Option<&'static dyn ring::signature::RsaEncoding> {
    match alg {
        Algorithm::RS256 => Some(&ring::signature::RSA_PKCS1_SHA256),
        Algorithm::RS384 => Some(&ring::signature::RSA_PKCS1_SHA384),
        Algorithm::RS512 => Some(&ring::signature::RSA_PKCS1_SHA512),
        Algorithm::PS256 => Some(&ring::signature::RSA_PSS_SHA256),
        Algorithm::PS384 => Some(&ring::signature::RSA_PSS_SHA384),
        Algorithm::PS512 => Some(&ring::signature::RSA_PSS_SHA512),
        _ => None,
    }
}

const fn is_rsa_family(alg: Algorithm) -> bool {
    matches!(alg.family(), Family::RsaPkcs1 | Family::RsaPss)
}

impl jws::Verifier for Rsa {
    type Error = error::KeyVerifyError;

    fn can_verify(&self, alg: Algorithm) -> bool {
        is_rsa_family(alg)
    }

    fn verify(&self, alg: Algorithm, data: &[u8], signature: &[u8]) -> Result<(), Self::Error> {
        self.public_key().verify(alg, data, signature)
    }
}

impl jws::Signer for Rsa {
    type Error = error::SigningError;

    #[cfg(feature = "private-keys")]
    fn can_sign(&self, alg: Algorithm) -> bool {
        if let Some(p) = self.private_key() {
            p.can_sign(alg)
        } else {
            false
        }
    }

    #[cfg(not(feature = "private-keys"))]
    fn can_sign(&self, _alg: Algorithm) -> bool {
        false
    }

    #[cfg(feature = "private-keys")]
    fn sign(&self, alg: Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        if let Some(p) = self.private_key() {
            p.sign(alg, data)
        } else {
            Err(error::missing_private_key().into())
        }
    }

    #[cfg(not(feature = "private-keys"))]
    fn sign(&self, _alg: Algorithm, _data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        Err(error::missing_private_key().into())
    }
}

impl From<PublicKey> for Rsa {
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
impl From<PrivateKey> for Rsa {
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

    #[test]
    fn private_key_pem_round_trip() {
        let key = Rsa::generate().unwrap();
        let pem = key.private_key().unwrap().to_pem().unwrap();
        let reimported = Rsa::private_key_from_pem(&pem).unwrap();
        assert_eq!(key, reimported);
    }

    #[test]
    fn public_key_pem_round_trip() {
        let key = Rsa::generate().unwrap().public_only();
        let pem = key.public_key().to_pem().unwrap();
        let reimported = Rsa::public_key_from_pem(&pem).unwrap();
        assert_eq!(key, reimported);
    }

    #[test]
    fn imported_4096_bit_key_signs_and_verifies() {
        let key = Rsa::private_key_from_pem(include_str!("../../data/rsa_4096.pem")).unwrap();

        let signature = key.sign(Algorithm::PS384, b"sign me").unwrap();
        assert_eq!(signature.len(), 512);
        key.verify(Algorithm::PS384, b"sign me", &signature).unwrap();
    }
}
