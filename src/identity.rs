//! Identity collaborator: principals, credentials, API tokens and page
//! sessions.
//!
//! The rest of the system treats this module as a black box with a simple
//! contract: provision a principal, verify credentials, resolve an opaque
//! token or session key back to a principal. Password hashes are salted
//! SHA-256; tokens and session keys are random alphanumeric strings.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

const TOKEN_LEN: usize = 40;
const SESSION_KEY_LEN: usize = 32;
const SALT_LEN: usize = 12;
const MIN_PASSWORD_LEN: usize = 8;

/// A short list of passwords too common to accept. The real-world lists are
/// much longer; the policy shape is what matters here.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "12345678", "123456789", "qwerty123", "letmein1", "iloveyou", "admin123",
    "welcome1", "monkey123", "dragon123", "football", "baseball", "sunshine", "princess",
    "trustno1", "superman", "password1", "password123",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("a user with that username already exists")]
    UsernameTaken,
    #[error("unknown user")]
    UnknownUser,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub is_superuser: bool,
}

/// The principal directory plus its credential material.
#[derive(Debug, Default)]
pub struct Directory {
    users: IndexMap<Uuid, User>,
    by_username: HashMap<String, Uuid>,
    tokens: HashMap<String, Uuid>,
    sessions: HashMap<String, Uuid>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_user(&mut self, new: NewUser) -> Result<Uuid, IdentityError> {
        if self.by_username.contains_key(&new.username) {
            return Err(IdentityError::UsernameTaken);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new.username.clone(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            is_superuser: new.is_superuser,
            date_joined: Utc::now(),
            password_hash: hash_password(&new.password),
        };
        let id = user.id;
        self.by_username.insert(new.username, id);
        self.users.insert(id, user);
        Ok(id)
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.by_username.get(username).and_then(|id| self.users.get(id))
    }

    /// Verifies credentials and returns the matching user.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        let user = self.user_by_username(username)?;
        verify_password(password, &user.password_hash).then_some(user)
    }

    /// Issues a fresh opaque API token for the user.
    pub fn issue_token(&mut self, user: Uuid) -> Result<String, IdentityError> {
        if !self.users.contains_key(&user) {
            return Err(IdentityError::UnknownUser);
        }
        let token = random_key(TOKEN_LEN);
        self.tokens.insert(token.clone(), user);
        Ok(token)
    }

    /// Registers a caller-chosen token. Used for the bootstrap admin, where
    /// the operator supplies the token value through configuration.
    pub fn register_token(&mut self, token: &str, user: Uuid) -> Result<(), IdentityError> {
        if !self.users.contains_key(&user) {
            return Err(IdentityError::UnknownUser);
        }
        self.tokens.insert(token.to_string(), user);
        Ok(())
    }

    pub fn token_owner(&self, token: &str) -> Option<&User> {
        self.tokens.get(token).and_then(|id| self.users.get(id))
    }

    pub fn open_session(&mut self, user: Uuid) -> Result<String, IdentityError> {
        if !self.users.contains_key(&user) {
            return Err(IdentityError::UnknownUser);
        }
        let key = random_key(SESSION_KEY_LEN);
        self.sessions.insert(key.clone(), user);
        Ok(key)
    }

    pub fn close_session(&mut self, key: &str) {
        self.sessions.remove(key);
    }

    pub fn session_owner(&self, key: &str) -> Option<&User> {
        self.sessions.get(key).and_then(|id| self.users.get(id))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

/// Password-strength policy applied at registration: minimum length, not
/// entirely numeric, not on the common list, not contained in the username.
pub fn validate_password(password: &str, username: &str) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        problems.push(format!(
            "this password is too short, it must contain at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("this password is entirely numeric".to_string());
    }
    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        problems.push("this password is too common".to_string());
    }
    if !username.is_empty() && lowered.contains(&username.to_lowercase()) {
        problems.push("the password is too similar to the username".to_string());
    }
    if problems.is_empty() { Ok(()) } else { Err(problems) }
}

fn random_key(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn hash_password(password: &str) -> String {
    let salt = random_key(SALT_LEN);
    let digest = digest_hex(&salt, password);
    format!("sha256${salt}${digest}")
}

fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("sha256"), Some(salt), Some(digest)) => digest_hex(salt, password) == digest,
        _ => false,
    }
}

fn digest_hex(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
