//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Staff role definitions

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Staff roles within the review center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, can manage staff accounts.
    Admin,
    /// Manages student records, enrollments, and certificates.
    Registrar,
    /// Records payments and refunds.
    Cashier,
}

impl UserRole {
    /// Returns true if this role can manage staff accounts.
    #[must_use]
    pub const fn can_manage_users(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this role can record or mutate payments.
    #[must_use]
    pub const fn can_handle_payments(&self) -> bool {
        matches!(self, Self::Admin | Self::Cashier)
    }

    /// Returns true if this role can issue certificates.
    #[must_use]
    pub const fn can_issue_certificates(&self) -> bool {
        matches!(self, Self::Admin | Self::Registrar)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Registrar => write!(f, "registrar"),
            Self::Cashier => write!(f, "cashier"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "registrar" => Ok(Self::Registrar),
            "cashier" => Ok(Self::Cashier),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.can_manage_users());
        assert!(!UserRole::Registrar.can_manage_users());
        assert!(!UserRole::Cashier.can_manage_users());

        assert!(UserRole::Admin.can_handle_payments());
        assert!(UserRole::Cashier.can_handle_payments());
        assert!(!UserRole::Registrar.can_handle_payments());

        assert!(UserRole::Registrar.can_issue_certificates());
        assert!(!UserRole::Cashier.can_issue_certificates());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("REGISTRAR").unwrap(), UserRole::Registrar);
        assert!(UserRole::from_str("janitor").is_err());
    }
}
