//! Pluggable credential verification.
//!
//! # Invariants
//! - `PlaintextVerifier` stores passwords unchanged and compares them by exact
//!   string equality. It offers no protection for stored credentials and only
//!   exists to keep data written by earlier builds usable.

/// Seals passwords for storage and checks presented passwords against them.
pub trait CredentialVerifier {
    /// Returns the value stored in `User::password` for a new account.
    fn seal(&self, password: &str) -> String;
    fn verify(&self, stored: &str, presented: &str) -> bool;
}

/// Exact-match plaintext verifier. Insecure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn seal(&self, password: &str) -> String {
        password.to_string()
    }

    fn verify(&self, stored: &str, presented: &str) -> bool {
        stored == presented
    }
}
