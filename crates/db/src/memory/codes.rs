//! Share code issuing and lookup.

use std::collections::HashMap;

use casal_core::access::{ShareCode, ShareCodeError, ShareCodeRules};
use casal_shared::types::CoupleId;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Letters and digits that cannot be mistaken for one another.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of generated codes.
pub const GENERATED_LEN: usize = 6;

#[derive(Debug, Clone, Copy)]
struct Entry {
    couple_id: CoupleId,
    expires_at: Option<DateTime<Utc>>,
}

/// Share codes known to the store.
#[derive(Debug, Default)]
pub(super) struct CodeRegistry {
    codes: HashMap<ShareCode, Entry>,
}

impl CodeRegistry {
    /// Workspace for `code`, unless unknown or expired at `now`.
    pub fn resolve(&self, code: &ShareCode, now: DateTime<Utc>) -> Option<CoupleId> {
        self.codes
            .get(code)
            .filter(|entry| entry.expires_at.is_none_or(|at| at > now))
            .map(|entry| entry.couple_id)
    }

    pub fn insert(
        &mut self,
        code: ShareCode,
        couple_id: CoupleId,
        expires_at: Option<DateTime<Utc>>,
    ) {
        self.codes.insert(
            code,
            Entry {
                couple_id,
                expires_at,
            },
        );
    }

    /// Marks `code` as expired at `now`. Returns false for unknown codes.
    pub fn expire(&mut self, code: &ShareCode, now: DateTime<Utc>) -> bool {
        self.codes.get_mut(code).is_some_and(|entry| {
            entry.expires_at = Some(now);
            true
        })
    }

    /// Generates a code not yet in use.
    pub fn generate(&self) -> Result<ShareCode, ShareCodeError> {
        let mut rng = rand::rng();
        loop {
            let raw: String = (0..GENERATED_LEN)
                .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
                .collect();
            let code = ShareCode::parse(&raw, &ShareCodeRules::default())?;
            if !self.codes.contains_key(&code) {
                return Ok(code);
            }
        }
    }
}
