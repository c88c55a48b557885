//! Content fingerprints of serialized rows.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::format::new_line;

/// SHA-256 digest of a serialized row.
///
/// Computed over the exact line a row is written as (fields joined by TAB plus
/// CRLF), so textually identical rows always fingerprint identically.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint an already serialized line.
    #[must_use]
    pub fn of_line(line: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(line.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Fingerprint a row by serializing it first.
    #[must_use]
    pub fn of_row<S: AsRef<str>>(row: &[S]) -> Self {
        Self::of_line(&new_line(row))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}
