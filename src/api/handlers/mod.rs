pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod opportunities;
pub mod prices;
pub mod protection;
pub mod rewards;
pub mod root;
pub mod ws;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::fhe::{Ciphertext, FheCipher};

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Encrypted sum of the values that decrypt under the current key.
/// Rows written under another key are logged and left out.
pub(crate) fn encrypted_total<'a, I>(cipher: &FheCipher, values: I) -> Ciphertext
where
    I: IntoIterator<Item = &'a Ciphertext>,
{
    let mut total = Decimal::ZERO;
    for value in values {
        match cipher.decrypt(value) {
            Ok(v) => total += v,
            Err(e) => tracing::warn!(error = %e, "Skipping undecryptable value in aggregate"),
        }
    }
    cipher.encrypt(total)
}
