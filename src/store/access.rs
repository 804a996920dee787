// src/store/access.rs
//
// Metered, optionally expiring access codes.

use chrono::{DateTime, Utc};

use super::{Store, StoreError, StoreResult};
use crate::models::access_code::AccessCode;

impl Store {
    /// Registers `code` for `test_id`. `None` limits mean unlimited / non-expiring.
    pub fn create_access_code(
        &self,
        code: &str,
        test_id: u64,
        max_uses: Option<u64>,
        expires_at: Option<DateTime<Utc>>,
    ) -> StoreResult<AccessCode> {
        let mut inner = self.write();

        if !inner.tests.contains_key(&test_id) {
            return Err(StoreError::NotFound("test"));
        }
        if inner.access_codes.contains_key(code) {
            return Err(StoreError::Conflict("access code already exists".to_string()));
        }

        let access_code = AccessCode {
            code: code.to_string(),
            test_id,
            max_uses,
            used_count: 0,
            expires_at,
            created_at: Utc::now(),
        };
        inner
            .access_codes
            .insert(access_code.code.clone(), access_code.clone());

        Ok(access_code)
    }

    /// Checks the code against `test_id` and consumes one use.
    ///
    /// This is not a pure read: call it exactly once per attempt creation.
    pub fn validate_access_code(&self, code: &str, test_id: u64) -> StoreResult<()> {
        let mut inner = self.write();

        let access_code = inner
            .access_codes
            .get_mut(code)
            .ok_or(StoreError::InvalidCode)?;

        if access_code.test_id != test_id {
            return Err(StoreError::WrongTest);
        }
        if access_code.is_expired_at(Utc::now()) {
            return Err(StoreError::Expired("access code"));
        }
        if access_code.is_exhausted() {
            return Err(StoreError::LimitReached);
        }

        access_code.used_count += 1;
        Ok(())
    }

    pub fn access_code(&self, code: &str) -> Option<AccessCode> {
        self.read().access_codes.get(code).cloned()
    }
}
