use std::sync::{Arc, RwLock};

use super::models::User;
use crate::error::{ApiError, Result};

/// Append-only account list. Duplicate emails are accepted.
#[derive(Clone, Debug, Default)]
pub struct UserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, user: User) -> Result<()> {
        self.users
            .write()
            .map_err(|e| ApiError::Internal(format!("user store lock poisoned: {}", e)))?
            .push(user);
        Ok(())
    }

    pub fn find_match(&self, email: &str, password: &str) -> Result<bool> {
        let users = self
            .users
            .read()
            .map_err(|e| ApiError::Internal(format!("user store lock poisoned: {}", e)))?;
        Ok(users.iter().any(|user| user.matches(email, password)))
    }

    pub fn len(&self) -> Result<usize> {
        self.users
            .read()
            .map(|users| users.len())
            .map_err(|e| ApiError::Internal(format!("user store lock poisoned: {}", e)))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
