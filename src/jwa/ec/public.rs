use aliri_base64::{Base64Url, Base64UrlRef};

use super::{coordinate_size, is_ec_family, verification_algorithm, Curve};
use crate::{error, jwa::Algorithm, jws};

/// ECC public key components
///
/// Coordinates are stored left-padded to the exact field size of the
/// curve, as required when reassembling the uncompressed point for
/// verification.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PublicKey {
    curve: Curve,
    x: Base64Url,
    y: Base64Url,
}

impl PublicKey {
    /// The curve this key is valid on
    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// The x-coordinate of the public point
    pub fn x_coordinate(&self) -> &Base64UrlRef {
        &self.x
    }

    /// The y-coordinate of the public point
    pub fn y_coordinate(&self) -> &Base64UrlRef {
        &self.y
    }

    /// Constructs a public key from the curve and affine coordinates
    ///
    /// # Errors
    ///
    /// A coordinate does not fit the field of the named curve.
    pub fn from_components(
        curve: Curve,
        x: impl Into<Base64Url>,
        y: impl Into<Base64Url>,
    ) -> Result<Self, error::KeyRejected> {
        let x = pad_coordinate(curve, x.into())?;
        let y = pad_coordinate(curve, y.into())?;

        Ok(Self { curve, x, y })
    }

    /// Imports an ECC public key from a PEM file
    ///
    /// # Errors
    ///
    /// The provided PEM file is not a valid ECC public key, or uses a
    /// curve other than P-256, P-384, or P-521.
    #[cfg(feature = "private-keys")]
    #[cfg_attr(docsrs, doc(cfg(feature = "private-keys")))]
    pub fn from_pem(pem: &str) -> Result<Self, error::KeyRejected> {
        let key = openssl::pkey::PKey::public_key_from_pem(pem.as_bytes())
            .map_err(error::key_rejected)?;
        let key = key.ec_key().map_err(error::key_rejected)?;
        Self::from_openssl_eckey(&*key)
    }

    #[cfg(feature = "private-keys")]
    pub(super) fn from_openssl_eckey<T: openssl::pkey::HasPublic>(
        key: &openssl::ec::EcKeyRef<T>,
    ) -> Result<Self, error::KeyRejected> {
        use openssl::bn::{BigNum, BigNumContext};

        let curve = super::groups::curve_from_group(key.group())
            .ok_or_else(|| error::key_rejected("unsupported curve"))?;

        let mut ctx = BigNumContext::new().map_err(error::key_rejected)?;
        let mut x = BigNum::new().map_err(error::key_rejected)?;
        let mut y = BigNum::new().map_err(error::key_rejected)?;

        key.public_key()
            .affine_coordinates_gfp(key.group(), &mut x, &mut y, &mut ctx)
            .map_err(error::key_rejected)?;

        let size = coordinate_size(curve);
        let x = x.to_vec_padded(size as i32).map_err(error::key_rejected)?;
        let y = y.to_vec_padded(size as i32).map_err(error::key_rejected)?;

        Ok(Self {
            curve,
            x: Base64Url::from_raw(x),
            y: Base64Url::from_raw(y),
        })
    }

    fn uncompressed_point(&self) -> Vec<u8> {
        let mut point = Vec::with_capacity(1 + self.x.as_slice().len() + self.y.as_slice().len());
        point.push(0x04);
        point.extend_from_slice(self.x.as_slice());
        point.extend_from_slice(self.y.as_slice());
        point
    }
}

fn pad_coordinate(curve: Curve, coord: Base64Url) -> Result<Base64Url, error::KeyRejected> {
    let size = coordinate_size(curve);
    let slice = coord.as_slice();
    if slice.len() == size {
        Ok(coord)
    } else if slice.len() < size {
        let mut padded = vec![0; size - slice.len()];
        padded.extend_from_slice(slice);
        Ok(Base64Url::from_raw(padded))
    } else {
        Err(error::key_rejected("coordinate does not fit the curve"))
    }
}

impl jws::Verifier for PublicKey {
    type Error = error::KeyVerifyError;

    fn can_verify(&self, alg: Algorithm) -> bool {
        is_ec_family(alg) && alg.curve() == Some(self.curve)
    }

    fn verify(&self, alg: Algorithm, data: &[u8], signature: &[u8]) -> Result<(), Self::Error> {
        if !self.can_verify(alg) {
            return Err(error::incompatible_algorithm(alg).into());
        }

        let params = verification_algorithm(self.curve)?;

        let pk = ring::signature::UnparsedPublicKey::new(params, self.uncompressed_point());
        pk.verify(data, signature)
            .map_err(|_| error::signature_mismatch())?;
        Ok(())
    }
}
