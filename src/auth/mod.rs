//! Master passphrase authentication
//!
//! Verifier, lockout guard and the bounded attempt loop that ties them
//! together.

pub mod attempts;
pub mod lockout;
pub mod verifier;

pub use attempts::{authenticate, AttemptBudget, AuthOutcome, MAX_ATTEMPTS};
pub use lockout::{CooldownStatus, LockoutGuard, LockoutState, COOLDOWN_WINDOW};
pub use verifier::MasterVerifier;
