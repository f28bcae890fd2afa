use std::{fmt, sync::Arc};

use aliri_base64::Base64Url;
use openssl::{
    pkey::Private,
    rsa::{Rsa, RsaPrivateKeyBuilder},
};
use ring::signature::RsaKeyPair;

use super::{signing_params, PublicKey};
use crate::{error, jwa::Algorithm, jws};

/// RSA private key components
#[derive(Clone)]
#[must_use]
pub struct PrivateKey {
    public_key: PublicKey,
    der: Vec<u8>,
    ring_cache: Arc<RsaKeyPair>,
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.der == other.der
    }
}

impl Eq for PrivateKey {}

impl PrivateKey {
    /// Generates a new 2048-bit RSA key pair
    ///
    /// # Errors
    ///
    /// Unable to generate a private key.
    pub fn generate() -> Result<Self, error::Unexpected> {
        let rsa = Rsa::generate(2048).map_err(error::unexpected)?;
        Self::from_openssl_key(&rsa).map_err(error::unexpected)
    }

    /// Imports an RSA key pair from a PEM file
    ///
    /// # Errors
    ///
    /// The provided PEM file is not a valid RSA private key.
    pub fn from_pem(pem: &str) -> Result<Self, error::KeyRejected> {
        let rsa = Rsa::private_key_from_pem(pem.as_bytes()).map_err(error::key_rejected)?;
        Self::from_openssl_key(&rsa)
    }

    fn from_openssl_key(rsa: &Rsa<Private>) -> Result<Self, error::KeyRejected> {
        let der = rsa.private_key_to_der().map_err(error::key_rejected)?;

        let public_key = PublicKey::from_components(
            Base64Url::from_raw(rsa.n().to_vec()),
            Base64Url::from_raw(rsa.e().to_vec()),
        )?;

        let ring_cache =
            Arc::new(RsaKeyPair::from_der(&der).map_err(|e| error::key_rejected(e.to_string()))?);

        Ok(Self {
            public_key,
            der,
            ring_cache,
        })
    }

    /// Constructs an RSA key pair from the private components
    ///
    /// # Errors
    ///
    /// The components do not assemble into a valid private key.
    pub fn from_components(
        modulus: impl Into<Base64Url>,
        exponent: impl Into<Base64Url>,
        private_exponent: impl Into<Base64Url>,
    ) -> Result<Self, error::KeyRejected> {
        use openssl::bn::BigNum;

        let builder = RsaPrivateKeyBuilder::new(
            BigNum::from_slice(modulus.into().as_slice()).map_err(error::key_rejected)?,
            BigNum::from_slice(exponent.into().as_slice()).map_err(error::key_rejected)?,
            BigNum::from_slice(private_exponent.into().as_slice()).map_err(error::key_rejected)?,
        )
        .map_err(error::key_rejected)?;

        Self::from_openssl_key(&builder.build())
    }

    /// The RSA key pair in DER encoding
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Exports the RSA key pair as a PEM file
    ///
    /// # Errors
    ///
    /// The stored DER could not be re-encoded as PEM.
    pub fn to_pem(&self) -> Result<String, error::Unexpected> {
        let key = Rsa::private_key_from_der(&self.der).map_err(error::unexpected)?;
        let pem = key.private_key_to_pem().map_err(error::unexpected)?;
        String::from_utf8(pem).map_err(error::unexpected)
    }

    /// Provides access to the public key parameters
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Extracts the public key
    pub fn into_public_key(self) -> PublicKey {
        self.public_key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl jws::Signer for PrivateKey {
    type Error = error::SigningError;

    fn can_sign(&self, alg: Algorithm) -> bool {
        super::is_rsa_family(alg)
    }

    fn sign(&self, alg: Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let params = signing_params(alg).ok_or_else(|| error::incompatible_algorithm(alg))?;

        let mut buf = vec![0; self.ring_cache.public().modulus_len()];
        self.ring_cache
            .sign(params, &ring::rand::SystemRandom::new(), data, &mut buf)
            .map_err(|e| error::unexpected(e.to_string()))?;
        Ok(buf)
    }
}
