use std::fmt;

use crate::cipher_codec::CipherError;

pub const KEY_DIGITS: usize = 4;
pub const MAX_KEY_VALUE: u16 = 9_999;

/// Key used when the user declines to set one. Decoders without key entry use it too.
pub const DEFAULT_KEY: CipherKey = CipherKey(0);

/// A 4-digit numeric cipher key in `0..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CipherKey(u16);

impl CipherKey {
    pub fn new(value: u32) -> Result<Self, CipherError> {
        u16::try_from(value)
            .ok()
            .filter(|value| *value <= MAX_KEY_VALUE)
            .map(Self)
            .ok_or(CipherError::KeyOutOfRange(value))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Zero-padded form, e.g. `0042`.
    pub fn digits(self) -> String {
        format!("{:0width$}", self.0, width = KEY_DIGITS)
    }
}

impl fmt::Display for CipherKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.digits())
    }
}

impl TryFrom<u32> for CipherKey {
    type Error = CipherError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
