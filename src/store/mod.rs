// src/store/mod.rs

//! In-memory state of the quiz platform.
//!
//! A single [`Store`] owns users, sessions, the test catalog, attempts,
//! access codes and assistant thread bindings. Everything lives behind one
//! reader/writer lock: reads share it, and every operation that checks a
//! precondition and then mutates holds the write guard for the whole
//! sequence. Callers only ever receive clones.
//!
//! Password hashing runs outside the lock.

mod access;
mod ai_threads;
mod attempts;
mod catalog;
mod error;
mod identity;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use catalog::seed_tests;
pub use error::StoreError;

use crate::{
    models::{
        access_code::AccessCode, ai_thread::AIThread, attempt::Attempt, test::Test, user::User,
    },
    utils::hash::{Argon2Hasher, CredentialHasher},
};

pub type StoreResult<T> = Result<T, StoreError>;

const SEED_EMAIL: &str = "user@test.test";
const SEED_PASSWORD: &str = "test";
const SEED_ACCESS_CODE: &str = "TEST-2025-INFINITY";

#[derive(Default)]
struct Inner {
    users: HashMap<u64, User>,
    users_by_email: HashMap<String, u64>,
    sessions: HashMap<String, u64>,
    tests: HashMap<u64, Test>,
    attempts: BTreeMap<u64, Attempt>,
    access_codes: HashMap<String, AccessCode>,
    ai_threads: HashMap<(u64, u64), AIThread>,
    next_user_id: u64,
    next_attempt_id: u64,
}

/// Authoritative process-lifetime state. Share it as `Arc<Store>`.
pub struct Store {
    inner: RwLock<Inner>,
    hasher: Arc<dyn CredentialHasher>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Arc::new(Argon2Hasher::new()))
    }
}

impl Store {
    pub fn new(hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_user_id: 1,
                next_attempt_id: 1,
                ..Inner::default()
            }),
            hasher,
        }
    }

    /// Loads the built-in catalog, the seed account and its unlimited access code.
    pub fn seed_defaults(&self) -> StoreResult<()> {
        self.seed_with_catalog(seed_tests())
    }

    /// Seeds the account and `tests`. Test 1, when present, gets the
    /// unlimited access code.
    pub fn seed_with_catalog(&self, tests: Vec<Test>) -> StoreResult<()> {
        self.create_user(SEED_EMAIL, SEED_PASSWORD)?;
        self.load_catalog(tests)?;
        if self.test_by_id(1).is_some() {
            self.create_access_code(SEED_ACCESS_CODE, 1, None, None)?;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::Store;
    use crate::utils::hash::Argon2Hasher;

    /// Store with cheap hashing parameters and the default seed loaded.
    pub fn seeded_store() -> Store {
        let store = empty_store();
        store.seed_defaults().unwrap();
        store
    }

    pub fn empty_store() -> Store {
        Store::new(Arc::new(Argon2Hasher::with_params(8, 1, 1).unwrap()))
    }
}
