// src/store/identity.rs
//
// Users and sessions.

use chrono::Utc;
use rand::{RngCore, rngs::OsRng};

use super::{Store, StoreError, StoreResult};
use crate::models::user::User;

/// Returns 128 random bits, hex encoded.
fn generate_session_token() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl Store {
    /// Registers a new account. The email must not be taken.
    pub fn create_user(&self, email: &str, password: &str) -> StoreResult<User> {
        if self.read().users_by_email.contains_key(email) {
            return Err(StoreError::Conflict("user already exists".to_string()));
        }

        let password_hash = self.hasher.hash(password)?;

        let mut inner = self.write();
        // Another registration may have won the race while we were hashing.
        if inner.users_by_email.contains_key(email) {
            return Err(StoreError::Conflict("user already exists".to_string()));
        }

        let user = User {
            id: inner.next_user_id,
            email: email.to_string(),
            password: password_hash,
            created_at: Utc::now(),
        };
        inner.next_user_id += 1;
        inner.users_by_email.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    /// Checks the credentials. Unknown email and wrong password are indistinguishable.
    pub fn authenticate_user(&self, email: &str, password: &str) -> StoreResult<User> {
        let user = {
            let inner = self.read();
            inner
                .users_by_email
                .get(email)
                .and_then(|id| inner.users.get(id))
                .cloned()
                .ok_or(StoreError::InvalidCredentials)?
        };

        if !self.hasher.verify(&user.password, password) {
            return Err(StoreError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Issues a fresh opaque session token bound to `user_id`.
    pub fn create_session(&self, user_id: u64) -> String {
        let mut inner = self.write();
        let mut token = generate_session_token();
        while inner.sessions.contains_key(&token) {
            token = generate_session_token();
        }
        inner.sessions.insert(token.clone(), user_id);
        token
    }

    /// Removes the session. Unknown tokens are ignored.
    pub fn delete_session(&self, token: &str) {
        self.write().sessions.remove(token);
    }

    pub fn get_user_by_session(&self, token: &str) -> Option<User> {
        let inner = self.read();
        let user_id = inner.sessions.get(token)?;
        inner.users.get(user_id).cloned()
    }
}
