//! Bounded authentication attempts
//!
//! [`authenticate`] checks the lockout first, then lets the caller supply up
//! to `max` passphrases. Each wrong one costs an attempt and a fixed delay;
//! the last wrong one starts the lockout instead of waiting.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::settings::LockoutPolicy;
use crate::crypto::{MasterKey, SecureString};
use crate::error::VaultResult;

use super::lockout::{CooldownStatus, LockoutGuard};
use super::verifier::MasterVerifier;

/// Wrong passphrases allowed before the lockout starts
pub const MAX_ATTEMPTS: u32 = 3;

/// Remaining attempts plus the pause between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptBudget {
    max: u32,
    remaining: u32,
    delay: Duration,
}

impl AttemptBudget {
    pub fn new(max: u32, delay: Duration) -> Self {
        Self {
            max,
            remaining: max,
            delay,
        }
    }

    /// A budget with no delay between attempts
    pub fn instant(max: u32) -> Self {
        Self::new(max, Duration::ZERO)
    }

    /// The fixed budget of [`MAX_ATTEMPTS`] with the configured delay
    pub fn from_policy(policy: &LockoutPolicy) -> Self {
        Self::new(MAX_ATTEMPTS, policy.retry_delay())
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// True once at least one attempt has been spent
    pub fn has_failures(&self) -> bool {
        self.remaining < self.max
    }

    /// Spend one attempt, returning how many are left
    pub fn consume(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }
}

/// How an authentication run ended
#[derive(Debug)]
pub enum AuthOutcome {
    /// The passphrase matched
    Granted(MasterKey),
    /// A lockout was already in effect; nothing was prompted
    LockedOut { remaining: Duration },
    /// Every attempt failed and a new lockout has started
    Denied { attempts: u32 },
}

/// Run the attempt loop.
///
/// `prompt` is called once per attempt with the budget as it stands, so a
/// caller can report how many attempts are left.
pub fn authenticate<F>(
    verifier: &MasterVerifier,
    guard: &LockoutGuard,
    mut budget: AttemptBudget,
    mut prompt: F,
) -> VaultResult<AuthOutcome>
where
    F: FnMut(&AttemptBudget) -> VaultResult<SecureString>,
{
    if let CooldownStatus::CoolingDown { remaining } = guard.check_cooldown()? {
        debug!(remaining_secs = remaining.as_secs(), "authentication refused during cooldown");
        return Ok(AuthOutcome::LockedOut { remaining });
    }

    while !budget.is_exhausted() {
        let passphrase = prompt(&budget)?;
        if let Some(key) = verifier.verify_and_derive(&passphrase)? {
            return Ok(AuthOutcome::Granted(key));
        }

        let left = budget.consume();
        if left > 0 {
            warn!(attempts_left = left, "wrong master passphrase");
            if !budget.delay().is_zero() {
                thread::sleep(budget.delay());
            }
        } else {
            guard.record_failure(left)?;
        }
    }

    Ok(AuthOutcome::Denied {
        attempts: budget.max(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::lockout::{LockoutState, COOLDOWN_WINDOW};
    use crate::crypto::{Salt, SALT_LEN};
    use crate::error::VaultError;
    use crate::storage::{MemoryBlobStore, SharedStore};
    use std::sync::Arc;
    use std::time::Instant;

    fn setup() -> (MasterVerifier, LockoutGuard) {
        let store: SharedStore = Arc::new(MemoryBlobStore::new());
        let verifier = MasterVerifier::new(store.clone(), Salt::from_bytes([8u8; SALT_LEN]));
        verifier.initialize("open sesame").unwrap();
        let guard = LockoutGuard::new(store, COOLDOWN_WINDOW);
        (verifier, guard)
    }

    fn scripted(answers: &[&str]) -> impl FnMut(&AttemptBudget) -> VaultResult<SecureString> {
        let mut answers: Vec<SecureString> = answers.iter().rev().map(|a| (*a).into()).collect();
        move |_| {
            answers
                .pop()
                .ok_or_else(|| VaultError::Validation("prompted too many times".into()))
        }
    }

    #[test]
    fn test_budget_consume() {
        let mut budget = AttemptBudget::instant(3);
        assert!(!budget.has_failures());
        assert_eq!(budget.consume(), 2);
        assert!(budget.has_failures());
        assert_eq!(budget.consume(), 1);
        assert_eq!(budget.consume(), 0);
        assert!(budget.is_exhausted());
        assert_eq!(budget.consume(), 0);
    }

    #[test]
    fn test_granted_first_try() {
        let (verifier, guard) = setup();
        let outcome =
            authenticate(&verifier, &guard, AttemptBudget::instant(3), scripted(&["open sesame"]))
                .unwrap();
        assert!(matches!(outcome, AuthOutcome::Granted(_)));
    }

    #[test]
    fn test_granted_on_last_attempt() {
        let (verifier, guard) = setup();
        let mut seen = Vec::new();
        let mut answers = scripted(&["a", "b", "open sesame"]);
        let outcome = authenticate(&verifier, &guard, AttemptBudget::instant(3), |budget| {
            seen.push(budget.remaining());
            answers(budget)
        })
        .unwrap();

        assert!(matches!(outcome, AuthOutcome::Granted(_)));
        assert_eq!(seen, vec![3, 2, 1]);
        assert_eq!(guard.state().unwrap(), LockoutState::Open);
    }

    #[test]
    fn test_three_failures_start_lockout() {
        let (verifier, guard) = setup();
        let outcome =
            authenticate(&verifier, &guard, AttemptBudget::instant(3), scripted(&["x", "y", "z"]))
                .unwrap();

        assert!(matches!(outcome, AuthOutcome::Denied { attempts: 3 }));
        assert_eq!(guard.state().unwrap(), LockoutState::CoolingDown);
    }

    #[test]
    fn test_locked_out_does_not_prompt() {
        let (verifier, guard) = setup();
        guard.record_failure(0).unwrap();

        let mut prompted = false;
        let outcome = authenticate(&verifier, &guard, AttemptBudget::instant(3), |_| {
            prompted = true;
            Ok("open sesame".into())
        })
        .unwrap();

        assert!(!prompted);
        match outcome {
            AuthOutcome::LockedOut { remaining } => assert!(remaining <= COOLDOWN_WINDOW),
            other => panic!("expected lockout, got {:?}", other),
        }
    }

    #[test]
    fn test_prompt_error_propagates_without_lockout() {
        let (verifier, guard) = setup();
        let result = authenticate(&verifier, &guard, AttemptBudget::instant(3), |_| {
            Err(VaultError::Io("stdin closed".into()))
        });

        assert!(matches!(result, Err(VaultError::Io(_))));
        assert_eq!(guard.state().unwrap(), LockoutState::Open);
    }

    #[test]
    fn test_from_policy_uses_fixed_budget() {
        let policy = LockoutPolicy {
            retry_delay_ms: 10,
        };
        let budget = AttemptBudget::from_policy(&policy);
        assert_eq!(budget.max(), MAX_ATTEMPTS);
        assert_eq!(budget.delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_delay_between_attempts_not_after_last() {
        let (verifier, guard) = setup();
        let delay = Duration::from_millis(300);
        let mut answers = scripted(&["x", "y", "z"]);
        let mut prompted_at = Vec::new();

        let outcome = authenticate(&verifier, &guard, AttemptBudget::new(3, delay), |budget| {
            prompted_at.push(Instant::now());
            answers(budget)
        })
        .unwrap();
        let finished = Instant::now();

        assert!(matches!(outcome, AuthOutcome::Denied { attempts: 3 }));
        assert_eq!(prompted_at.len(), 3);
        let second_gap = prompted_at[2] - prompted_at[1];
        assert!(prompted_at[1] - prompted_at[0] >= delay);
        assert!(second_gap >= delay);

        // Each gap is one derivation plus the pause; after the last answer
        // only the derivation remains
        let after_last = finished - prompted_at[2];
        assert!(after_last + delay / 2 < second_gap);
    }
}
