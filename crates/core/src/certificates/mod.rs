//! Good moral certificate logic.
//!
//! Serial number format and validation for issued certificates.

mod serial;

pub use serial::{CertificateSerial, SerialError};
