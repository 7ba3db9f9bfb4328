//! Brute-force lockout
//!
//! When the attempt budget runs out, the time of the lockout is written to
//! the cooldown marker. While the marker exists and the window has not
//! elapsed, no authentication attempt may proceed. The marker is removed by
//! the first check after the window has passed.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use tracing::{info, warn};

use crate::error::VaultResult;
use crate::storage::{SharedStore, COOLDOWN_BLOB};

/// Lockout length after the last wrong passphrase; not configurable
pub const COOLDOWN_WINDOW: Duration = Duration::from_secs(180);

/// Persisted lockout state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutState {
    Open,
    CoolingDown,
}

/// Result of a cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    /// Attempts are allowed
    Open,
    /// Attempts are refused for at least `remaining`
    CoolingDown { remaining: Duration },
}

impl CooldownStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Tracks failed-authentication lockouts
pub struct LockoutGuard {
    store: SharedStore,
    window: Duration,
}

impl LockoutGuard {
    pub fn new(store: SharedStore, window: Duration) -> Self {
        Self { store, window }
    }

    /// Current state, derived from the presence of the marker
    pub fn state(&self) -> VaultResult<LockoutState> {
        if self.store.exists(COOLDOWN_BLOB)? {
            Ok(LockoutState::CoolingDown)
        } else {
            Ok(LockoutState::Open)
        }
    }

    /// Record a failed attempt; starts the lockout once none remain
    pub fn record_failure(&self, attempts_remaining: u32) -> VaultResult<LockoutState> {
        self.record_failure_at(attempts_remaining, Utc::now())
    }

    pub fn record_failure_at(
        &self,
        attempts_remaining: u32,
        now: DateTime<Utc>,
    ) -> VaultResult<LockoutState> {
        if attempts_remaining > 0 {
            return self.state();
        }

        self.write_marker(now)?;
        let until = now + chrono::Duration::seconds(self.window.as_secs() as i64);
        warn!(%until, "all attempts used, vault locked");
        Ok(LockoutState::CoolingDown)
    }

    /// Check whether attempts may proceed, clearing an expired lockout
    pub fn check_cooldown(&self) -> VaultResult<CooldownStatus> {
        self.check_cooldown_at(Utc::now())
    }

    pub fn check_cooldown_at(&self, now: DateTime<Utc>) -> VaultResult<CooldownStatus> {
        let Some(bytes) = self.store.read(COOLDOWN_BLOB)? else {
            return Ok(CooldownStatus::Open);
        };

        let Some(started) = parse_timestamp(&String::from_utf8_lossy(&bytes)) else {
            // Unreadable marker: restart the lockout from now
            warn!("cooldown marker unreadable, restarting lockout");
            self.write_marker(now)?;
            return Ok(CooldownStatus::CoolingDown {
                remaining: self.window,
            });
        };

        let elapsed = (now - started).to_std().unwrap_or(Duration::ZERO);
        if elapsed >= self.window {
            self.store.delete(COOLDOWN_BLOB)?;
            info!("lockout window elapsed, attempts allowed again");
            return Ok(CooldownStatus::Open);
        }

        Ok(CooldownStatus::CoolingDown {
            remaining: self.window - elapsed,
        })
    }

    fn write_marker(&self, now: DateTime<Utc>) -> VaultResult<()> {
        let line = format!("{}\n", now.to_rfc3339());
        self.store.write(COOLDOWN_BLOB, line.as_bytes())
    }
}

/// Parse an RFC 3339 timestamp, or the naive local ISO-8601 form older
/// vaults wrote
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .map(|local| local.with_timezone(&Utc))
}
