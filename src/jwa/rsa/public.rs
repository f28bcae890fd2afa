use aliri_base64::{Base64Url, Base64UrlRef};
#[cfg(feature = "private-keys")]
use openssl::{bn::BigNum, rsa::Rsa};

use super::verification_params;
use crate::{error, jwa::Algorithm, jws};

/// RSA public key components
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PublicKey {
    modulus: Base64Url,
    exponent: Base64Url,
}

impl PublicKey {
    /// The public key's modulus
    pub fn modulus(&self) -> &Base64UrlRef {
        &self.modulus
    }

    /// The public key's exponent
    pub fn exponent(&self) -> &Base64UrlRef {
        &self.exponent
    }

    /// Imports an RSA public key from a PEM file
    ///
    /// # Errors
    ///
    /// The provided PEM file is not a valid RSA public key.
    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    pub fn from_pem(pem: &str) -> Result<Self, error::KeyRejected> {
        let rsa = Rsa::public_key_from_pem(pem.as_bytes()).map_err(error::key_rejected)?;
        Self::from_components(
            Base64Url::from_raw(rsa.n().to_vec()),
            Base64Url::from_raw(rsa.e().to_vec()),
        )
    }

    /// Exports an RSA public key to a PEM file
    ///
    /// # Errors
    ///
    /// The key components could not be re-assembled into a public key.
    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    pub fn to_pem(&self) -> Result<String, error::Unexpected> {
        let modulus = BigNum::from_slice(self.modulus.as_slice()).map_err(error::unexpected)?;
        let exponent = BigNum::from_slice(self.exponent.as_slice()).map_err(error::unexpected)?;

        let key = Rsa::from_public_components(modulus, exponent).map_err(error::unexpected)?;
        let pem = key.public_key_to_pem().map_err(error::unexpected)?;
        String::from_utf8(pem).map_err(error::unexpected)
    }

    /// Constructs a public key from the modulus and exponent
    ///
    /// # Errors
    ///
    /// The modulus is outside the supported 2048–8192-bit range.
    pub fn from_components(
        modulus: impl Into<Base64Url>,
        exponent: impl Into<Base64Url>,
    ) -> Result<Self, error::KeyRejected> {
        let modulus = modulus.into();
        let exponent = exponent.into();
        if !(256..=1024).contains(&modulus.as_slice().len()) {
            return Err(error::key_rejected(
                "key modulus must be between 2048 and 8192 bits",
            ));
        }

        Ok(Self { modulus, exponent })
    }
}

impl jws::Verifier for PublicKey {
    type Error = error::KeyVerifyError;

    fn can_verify(&self, alg: Algorithm) -> bool {
        super::is_rsa_family(alg)
    }

    fn verify(&self, alg: Algorithm, data: &[u8], signature: &[u8]) -> Result<(), Self::Error> {
        let params = verification_params(alg).ok_or_else(|| error::incompatible_algorithm(alg))?;

        let pk = ring::signature::RsaPublicKeyComponents {
            n: self.modulus.as_slice(),
            e: self.exponent.as_slice(),
        };

        pk.verify(params, data, signature)
            .map_err(|_| error::signature_mismatch())?;
        Ok(())
    }
}
