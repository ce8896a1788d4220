use std::collections::HashMap;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::error::{AppError, Result};
use crate::models::session::SessionClaims;

/// One account the directory knows about.
struct Account {
    user_id: String,
    email: String,
    password_hash: String,
    role: String,
    name: String,
}

/// In-memory account directory backing the login credential check.
///
/// The real deployment fronts a relational user store; that layer is a
/// collaborator outside this gateway's scope, so the directory is seeded
/// with one demo principal per role, hashed with Argon2id at startup.
pub struct AccountDirectory {
    by_email: HashMap<String, Account>,
}

impl AccountDirectory {
    /// Builds the demo directory.
    pub fn seeded() -> Result<Self> {
        let seeds = [
            ("S-1001", "alice.chen@school.example", "student-pass-1", "student", "Alice Chen"),
            ("G-2001", "bob.wu@family.example", "guardian-pass-1", "guardian", "Bob Wu"),
            ("A-3001", "carol.diaz@school.example", "aro-pass-1", "ARO", "Carol Diaz"),
            ("D-4001", "dan.okafor@school.example", "dro-pass-1", "DRO", "Dan Okafor"),
        ];

        let mut by_email = HashMap::new();
        for (user_id, email, password, role, name) in seeds {
            let account = Account {
                user_id: user_id.to_string(),
                email: email.to_string(),
                password_hash: hash_password(password)?,
                role: role.to_string(),
                name: name.to_string(),
            };
            by_email.insert(email.to_string(), account);
        }

        Ok(Self { by_email })
    }

    /// Checks credentials and returns the claims for a fresh session.
    ///
    /// Returns `None` on unknown email or wrong password; callers must not
    /// distinguish the two cases in their response.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<SessionClaims>> {
        let Some(account) = self.by_email.get(email) else {
            return Ok(None);
        };

        if !verify_password(password, &account.password_hash)? {
            return Ok(None);
        }

        Ok(Some(SessionClaims {
            user_id: account.user_id.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
            name: account.name.clone(),
        }))
    }
}

/// Hashes a password using Argon2id.
fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let password_hash = Argon2::default()
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    Ok(password_hash)
}

/// Verifies a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    Ok(result)
}
