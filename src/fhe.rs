//! Simulated "FHE" value envelopes.
//!
//! Values are rendered as `fhe1:<base64url(decimal)>:<tag>` where `tag` is a
//! truncated HMAC-SHA256 over the plaintext. This is a keyed, reversible
//! encoding and provides no confidentiality. The arithmetic helpers decrypt,
//! compute and re-encrypt.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const VERSION: &str = "fhe1";
const TAG_BYTES: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum FheError {
    #[error("invalid cipher key")]
    InvalidKey,

    #[error("malformed ciphertext")]
    Malformed,

    #[error("unsupported ciphertext version: {0}")]
    UnsupportedVersion(String),

    #[error("ciphertext payload is not valid base64")]
    Encoding,

    #[error("ciphertext tag mismatch")]
    TagMismatch,

    #[error("ciphertext payload is not a number: {0}")]
    NotANumber(String),
}

/// An encoded value as stored and served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct Ciphertext(String);

impl Ciphertext {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
pub struct FheCipher {
    mac: HmacSha256,
}

impl fmt::Debug for FheCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FheCipher").finish_non_exhaustive()
    }
}

impl FheCipher {
    pub fn new(key: &str) -> Result<Self, FheError> {
        let mac = HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| FheError::InvalidKey)?;
        Ok(Self { mac })
    }

    pub fn encrypt(&self, value: Decimal) -> Ciphertext {
        let plain = value.normalize().to_string();
        let tag = self.tag(&plain);
        Ciphertext(format!(
            "{VERSION}:{}:{}",
            URL_SAFE_NO_PAD.encode(plain.as_bytes()),
            hex::encode(&tag[..TAG_BYTES])
        ))
    }

    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Decimal, FheError> {
        let mut parts = ciphertext.as_str().split(':');
        let (Some(version), Some(payload), Some(tag), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(FheError::Malformed);
        };

        if version != VERSION {
            return Err(FheError::UnsupportedVersion(version.to_string()));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| FheError::Encoding)?;
        let plain = String::from_utf8(bytes).map_err(|_| FheError::Encoding)?;

        let tag = hex::decode(tag).map_err(|_| FheError::Malformed)?;
        let mut mac = self.mac.clone();
        mac.update(plain.as_bytes());
        mac.verify_truncated_left(&tag)
            .map_err(|_| FheError::TagMismatch)?;

        Decimal::from_str(&plain).map_err(|_| FheError::NotANumber(plain))
    }

    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext, FheError> {
        Ok(self.encrypt(self.decrypt(a)? + self.decrypt(b)?))
    }

    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext, FheError> {
        Ok(self.encrypt(self.decrypt(a)? - self.decrypt(b)?))
    }

    /// Multiply an encrypted value by a plaintext scalar.
    pub fn mul_plain(&self, a: &Ciphertext, scalar: Decimal) -> Result<Ciphertext, FheError> {
        Ok(self.encrypt(self.decrypt(a)? * scalar))
    }

    /// Encrypted sum; an empty input sums to an encrypted zero.
    pub fn sum<'a, I>(&self, values: I) -> Result<Ciphertext, FheError>
    where
        I: IntoIterator<Item = &'a Ciphertext>,
    {
        let mut total = Decimal::ZERO;
        for value in values {
            total += self.decrypt(value)?;
        }
        Ok(self.encrypt(total))
    }

    pub fn gt(&self, a: &Ciphertext, b: &Ciphertext) -> Result<bool, FheError> {
        Ok(self.decrypt(a)? > self.decrypt(b)?)
    }

    fn tag(&self, plain: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(plain.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
