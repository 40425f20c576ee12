use super::error::AuthError;

/// Salted bcrypt hashing with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash password for storage in the credential table.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A malformed hash is treated as a mismatch rather than an error.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::debug!("Rejecting malformed password hash: {}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn verifies_own_hash() {
        let hash = hasher().hash("secret").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(hasher().verify("secret", &hash));
        assert!(!hasher().verify("Secret", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hasher().hash("secret").unwrap();
        let b = hasher().hash("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!hasher().verify("secret", "not-a-bcrypt-hash"));
        assert!(!hasher().verify("secret", ""));
    }
}
