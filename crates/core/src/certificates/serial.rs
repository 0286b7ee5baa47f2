//! Certificate serial numbers.
//!
//! Issued good moral certificates carry a control number in the form
//! `GM-<year>-<sequence>`, e.g. `GM-2026-000042`. The sequence restarts
//! every calendar year and is zero-padded to six digits.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the zero-padded sequence component.
const SEQ_WIDTH: usize = 6;

/// Errors that can occur when parsing a certificate serial.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SerialError {
    /// The serial does not match the `GM-<year>-<seq>` shape.
    #[error("malformed certificate serial: {0}")]
    Malformed(String),

    /// The year component is out of a plausible range.
    #[error("implausible certificate year: {0}")]
    ImplausibleYear(i32),

    /// The sequence component is zero.
    #[error("certificate sequence starts at 1")]
    ZeroSequence,
}

/// A parsed good moral certificate control number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CertificateSerial {
    year: i32,
    sequence: u32,
}

impl CertificateSerial {
    /// Builds a serial from its components.
    ///
    /// # Errors
    ///
    /// Returns `SerialError` if the year is implausible or the sequence is
    /// zero.
    pub fn new(year: i32, sequence: u32) -> Result<Self, SerialError> {
        if !(2000..=2200).contains(&year) {
            return Err(SerialError::ImplausibleYear(year));
        }
        if sequence == 0 {
            return Err(SerialError::ZeroSequence);
        }
        Ok(Self { year, sequence })
    }

    /// The issuance year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The per-year sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The serial that follows this one within the same year.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            year: self.year,
            sequence: self.sequence + 1,
        }
    }
}

impl std::fmt::Display for CertificateSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GM-{}-{:0width$}",
            self.year,
            self.sequence,
            width = SEQ_WIDTH
        )
    }
}

impl std::str::FromStr for CertificateSerial {
    type Err = SerialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SerialError::Malformed(s.to_string());

        let rest = s.strip_prefix("GM-").ok_or_else(malformed)?;
        let (year_part, seq_part) = rest.split_once('-').ok_or_else(malformed)?;

        let year: i32 = year_part.parse().map_err(|_| malformed())?;
        if seq_part.len() != SEQ_WIDTH || !seq_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let sequence: u32 = seq_part.parse().map_err(|_| malformed())?;

        Self::new(year, sequence)
    }
}

impl From<CertificateSerial> for String {
    fn from(serial: CertificateSerial) -> Self {
        serial.to_string()
    }
}

impl TryFrom<String> for CertificateSerial {
    type Error = SerialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_format() {
        let serial = CertificateSerial::new(2026, 42).unwrap();
        assert_eq!(serial.to_string(), "GM-2026-000042");
    }

    #[test]
    fn test_parse_roundtrip() {
        let serial = CertificateSerial::from_str("GM-2026-000042").unwrap();
        assert_eq!(serial.year(), 2026);
        assert_eq!(serial.sequence(), 42);
        assert_eq!(serial.to_string(), "GM-2026-000042");
    }

    #[test]
    fn test_next_increments_sequence() {
        let serial = CertificateSerial::new(2026, 1).unwrap();
        assert_eq!(serial.next().to_string(), "GM-2026-000002");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(CertificateSerial::from_str("GM-2026").is_err());
        assert!(CertificateSerial::from_str("XX-2026-000001").is_err());
        assert!(CertificateSerial::from_str("GM-2026-42").is_err());
        assert!(CertificateSerial::from_str("GM-abcd-000001").is_err());
    }

    #[test]
    fn test_rejects_zero_sequence() {
        assert_eq!(
            CertificateSerial::from_str("GM-2026-000000"),
            Err(SerialError::ZeroSequence)
        );
    }

    #[test]
    fn test_rejects_implausible_year() {
        assert_eq!(
            CertificateSerial::new(1926, 1),
            Err(SerialError::ImplausibleYear(1926))
        );
    }
}
