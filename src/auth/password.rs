//! Argon2id password hashing.
//!
//! Digests are PHC strings, so the salt and cost parameters travel with the
//! hash and no separate salt storage is needed.

use anyhow::{Result, anyhow};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher as _, SaltString},
};
use rand::rngs::OsRng;

use super::config::PasswordCost;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordCheck {
    Match,
    Mismatch,
}

#[derive(Clone, Debug)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// # Errors
    /// Returns an error if the cost parameters are outside Argon2's bounds.
    pub fn new(cost: PasswordCost) -> Result<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|err| anyhow!("invalid argon2 parameters: {err}"))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// Only fails if the system RNG or the hasher itself fails.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| anyhow!("failed to hash password: {err}"))
    }

    /// Compare a plaintext against a stored digest.
    ///
    /// A wrong password is [`PasswordCheck::Mismatch`], not an error.
    ///
    /// # Errors
    /// Returns an error only when the stored digest cannot be parsed.
    pub fn verify(&self, digest: &str, plaintext: &str) -> Result<PasswordCheck> {
        let parsed =
            PasswordHash::new(digest).map_err(|err| anyhow!("invalid password digest: {err}"))?;
        // Parameters come from the digest, not from `self`.
        if self
            .argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(PasswordCheck::Match)
        } else {
            Ok(PasswordCheck::Mismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> Result<PasswordHasher> {
        PasswordHasher::new(PasswordCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn hash_and_verify() -> Result<()> {
        let hasher = fast_hasher()?;
        let digest = hasher.hash("password1")?;

        assert!(digest.starts_with("$argon2id$"));
        assert_eq!(hasher.verify(&digest, "password1")?, PasswordCheck::Match);
        assert_eq!(hasher.verify(&digest, "password2")?, PasswordCheck::Mismatch);
        Ok(())
    }

    #[test]
    fn same_password_gets_distinct_salts() -> Result<()> {
        let hasher = fast_hasher()?;
        let first = hasher.hash("same-password")?;
        let second = hasher.hash("same-password")?;

        assert_ne!(first, second);
        assert_eq!(hasher.verify(&first, "same-password")?, PasswordCheck::Match);
        assert_eq!(hasher.verify(&second, "same-password")?, PasswordCheck::Match);
        Ok(())
    }

    #[test]
    fn verify_uses_digest_parameters() -> Result<()> {
        let digest = fast_hasher()?.hash("password1")?;
        let stronger = PasswordHasher::new(PasswordCost {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })?;
        assert_eq!(stronger.verify(&digest, "password1")?, PasswordCheck::Match);
        Ok(())
    }

    #[test]
    fn invalid_digest_is_an_error() -> Result<()> {
        let hasher = fast_hasher()?;
        assert!(hasher.verify("not-a-valid-hash", "password1").is_err());
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_cost() {
        let result = PasswordHasher::new(PasswordCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }
}
