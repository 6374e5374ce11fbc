//! Salted password hashing.

use crate::error::{PortalError, Result};

/// bcrypt with a configurable work factor.
///
/// Hashing and verification run on the blocking pool so a slow cost setting
/// never stalls the request executor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| PortalError::Internal(e.to_string()))?
            .map_err(|e| PortalError::Internal(format!("password hashing failed: {e}")))
    }

    /// `false` for a wrong password. A malformed stored hash is an error.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| PortalError::Internal(e.to_string()))?
            .map_err(|e| PortalError::Internal(format!("password verification failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_is_salted_and_verifies() {
        let hasher = PasswordHasher::new(4);
        let a = hasher.hash("password123").await.unwrap();
        let b = hasher.hash("password123").await.unwrap();

        assert_ne!(a, "password123");
        assert_ne!(a, b);
        assert!(hasher.verify("password123", &a).await.unwrap());
        assert!(hasher.verify("password123", &b).await.unwrap());
        assert!(!hasher.verify("password124", &a).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        let hasher = PasswordHasher::new(4);
        assert!(hasher.verify("password123", "not-a-hash").await.is_err());
    }
}
