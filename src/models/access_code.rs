// src/models/access_code.rs

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shape accepted for access codes on the wire: letters, digits and dashes.
pub static ACCESS_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{2,63}$").unwrap());

/// Shared secret gating attempt creation for one test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCode {
    pub code: String,
    pub test_id: u64,

    /// `None` means unlimited.
    pub max_uses: Option<u64>,
    pub used_count: u64,

    /// `None` means the code never expires.
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AccessCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|max| self.used_count >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_accepts_seed_code() {
        assert!(ACCESS_CODE_PATTERN.is_match("TEST-2025-INFINITY"));
    }

    #[test]
    fn pattern_rejects_garbage() {
        assert!(!ACCESS_CODE_PATTERN.is_match(""));
        assert!(!ACCESS_CODE_PATTERN.is_match("-abc"));
        assert!(!ACCESS_CODE_PATTERN.is_match("code with spaces"));
    }
}
