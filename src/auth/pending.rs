// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pending authentication codes (phase 1 of sign-in).
//!
//! A pending code proves that a client has started the sign-in flow. Codes
//! are single-use and expire after a fixed window (10 minutes by default).
//!
//! ## Lifecycle
//!
//! - `issue` creates a code and records its absolute expiry.
//! - `redeem` removes the code on every hit. A hit after expiry still
//!   removes the entry but reports [`RedeemError::Expired`].
//! - Expired entries that are never redeemed are reclaimed by
//!   [`PendingAuthStore::purge_expired`] (see `sweeper.rs`).
//!
//! The map is only reachable through these operations. Lookup and delete
//! happen under one lock, so two concurrent redemptions of the same code
//! cannot both succeed.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

/// Default validity window for a pending code (10 minutes).
pub const DEFAULT_CODE_TTL_SECS: i64 = 600;

/// Random bytes per code (128 bits).
const CODE_BYTES: usize = 16;

/// Errors raised while issuing a pending code.
#[derive(Debug, Error)]
pub enum PendingAuthError {
    #[error("secure random source failed")]
    RandomSource,
    #[error("generated auth code collided with a live code")]
    Collision,
}

/// Why a redemption did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RedeemError {
    #[error("auth code not found")]
    NotFound,
    #[error("auth code expired")]
    Expired,
}

/// A freshly issued pending code.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// In-memory registry of outstanding sign-in attempts.
pub struct PendingAuthStore {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
    ttl: Duration,
    rng: SystemRandom,
}

impl PendingAuthStore {
    /// Create a store whose codes live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            rng: SystemRandom::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new code valid from now.
    pub fn issue(&self) -> Result<IssuedCode, PendingAuthError> {
        self.issue_at(Utc::now())
    }

    /// Issue a new code as if the current time were `now`.
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<IssuedCode, PendingAuthError> {
        let code = self.generate_code()?;
        let expires_at = now + self.ttl;

        let mut entries = self.entries();
        if entries.contains_key(&code) {
            return Err(PendingAuthError::Collision);
        }
        entries.insert(code.clone(), expires_at);

        Ok(IssuedCode { code, expires_at })
    }

    /// Redeem a code. The entry is removed whenever it exists.
    pub fn redeem(&self, code: &str) -> Result<(), RedeemError> {
        self.redeem_at(code, Utc::now())
    }

    /// Redeem a code as if the current time were `now`.
    pub fn redeem_at(&self, code: &str, now: DateTime<Utc>) -> Result<(), RedeemError> {
        let expires_at = self
            .entries()
            .remove(code)
            .ok_or(RedeemError::NotFound)?;

        if now > expires_at {
            return Err(RedeemError::Expired);
        }
        Ok(())
    }

    /// Drop every entry that expired before now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, expires_at| now <= *expires_at);
        before - entries.len()
    }

    /// Number of live or not-yet-purged entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn generate_code(&self) -> Result<String, PendingAuthError> {
        let mut bytes = [0u8; CODE_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| PendingAuthError::RandomSource)?;
        Ok(Base64UrlUnpadded::encode_string(&bytes))
    }

    // Every critical section is a single map operation, so a poisoned map
    // is still consistent.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, DateTime<Utc>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PendingAuthStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_CODE_TTL_SECS))
    }
}
