//! HMAC signing keys

use std::fmt;

use aliri_base64::{Base64Url, Base64UrlRef};
use ring::rand::SecureRandom;

use crate::{
    error,
    jwa::{Algorithm, Family},
    jws,
};

/// HMAC secret
#[derive(Clone, PartialEq, Eq)]
#[must_use]
pub struct Hmac {
    secret: Base64Url,
}

impl fmt::Debug for Hmac {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Hmac { secret }")
    }
}

impl Hmac {
    /// HMAC using the provided secret
    pub fn new(secret: impl Into<Base64Url>) -> Self {
        let secret = secret.into();
        Self { secret }
    }

    /// Generates a new HMAC secret sized for the given algorithm
    ///
    /// # Errors
    ///
    /// The algorithm is not an HMAC algorithm, or the secret could not be
    /// generated.
    pub fn generate(alg: Algorithm) -> Result<Self, error::SigningError> {
        Self::generate_with_rng(alg, &ring::rand::SystemRandom::new())
    }

    /// Generates a new HMAC secret using the provided source of randomness
    ///
    /// # Errors
    ///
    /// The algorithm is not an HMAC algorithm, or the secret could not be
    /// generated from the provided RNG.
    pub fn generate_with_rng(
        alg: Algorithm,
        rng: &dyn SecureRandom,
    ) -> Result<Self, error::SigningError> {
        if alg.family() != Family::Hmac {
            return Err(error::incompatible_algorithm(alg).into());
        }

        let bytes = usize::from(alg.hash_size()) / 8;
        let mut secret = Base64Url::from_raw(vec![0; bytes]);

        rng.fill(secret.as_mut_slice())
            .map_err(|_| error::unexpected("random number generator failure"))?;

        Ok(Self { secret })
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn secret(&self) -> &Base64UrlRef {
        &self.secret
    }
}

fn ring_algorithm(alg: Algorithm) -> Option<ring::hmac::Algorithm> {
    match alg {
        Algorithm::HS256 => Some(ring::hmac::HMAC_SHA256),
        Algorithm::HS384 => Some(ring::hmac::HMAC_SHA384),
        Algorithm::HS512 => Some(ring::hmac::HMAC_SHA512),
        _ => None,
    }
}

impl jws::Signer for Hmac {
    type Error = error::SigningError;

    fn can_sign(&self, alg: Algorithm) -> bool {
        alg.family() == Family::Hmac
    }

    fn sign(&self, alg: Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let ring_alg = ring_algorithm(alg).ok_or_else(|| error::incompatible_algorithm(alg))?;
        let key = ring::hmac::Key::new(ring_alg, self.secret.as_slice());
        let digest = ring::hmac::sign(&key, data);
        Ok(digest.as_ref().to_owned())
    }
}

impl jws::Verifier for Hmac {
    type Error = error::KeyVerifyError;

    fn can_verify(&self, alg: Algorithm) -> bool {
        alg.family() == Family::Hmac
    }

    fn verify(&self, alg: Algorithm, data: &[u8], signature: &[u8]) -> Result<(), Self::Error> {
        let ring_alg = ring_algorithm(alg).ok_or_else(|| error::incompatible_algorithm(alg))?;
        let key = ring::hmac::Key::new(ring_alg, self.secret.as_slice());
        ring::hmac::verify(&key, data, signature).map_err(|_| error::signature_mismatch())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jws::{Signer, Verifier};

    #[test]
    fn generated_secret_matches_hash_size() {
        let key = Hmac::generate(Algorithm::HS384).unwrap();
        assert_eq!(key.secret().as_slice().len(), 48);
    }

    #[test]
    fn rejects_generation_for_foreign_family() {
        let err = Hmac::generate(Algorithm::RS256).unwrap_err();
        assert!(matches!(
            err,
            error::SigningError::IncompatibleAlgorithm(_)
        ));
    }

    #[test]
    fn sign_verify_round_trip() {
        let key = Hmac::generate(Algorithm::HS256).unwrap();
        let sig = key.sign(Algorithm::HS256, b"data").unwrap();
        key.verify(Algorithm::HS256, b"data", &sig).unwrap();

        let err = key.verify(Algorithm::HS256, b"datum", &sig).unwrap_err();
        assert!(err.is_signature_mismatch());
    }

    #[test]
    fn refuses_foreign_family() {
        let key = Hmac::generate(Algorithm::HS256).unwrap();
        assert!(!key.can_verify(Algorithm::ES256));
        let err = key.verify(Algorithm::ES256, b"data", b"sig").unwrap_err();
        assert!(err.is_incompatible_alg());
    }
}
