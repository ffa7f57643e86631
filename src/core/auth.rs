//! Auth - shop registration and login
//!
//! Sits outside the inventory core: its only output the core cares about is
//! a [`ShopId`]. Passwords are stored as argon2 PHC strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::Serialize;

use super::error::{AuthError, StoreError};
use super::store::{ShopId, Store};

/// Result of a registration attempt. Name collisions are a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created { shop_id: ShopId },
    Rejected { reason: String },
}

impl Registration {
    fn rejected(reason: &str) -> Self {
        Registration::Rejected {
            reason: reason.to_string(),
        }
    }
}

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub shop_id: ShopId,
}

/// Create a shop and its admin user together; either both exist afterwards
/// or neither does.
pub fn register_shop(
    store: &mut Store,
    shop_name: &str,
    username: &str,
    password: &str,
) -> Result<Registration, AuthError> {
    let shop_name = shop_name.trim();
    let username = username.trim();
    if shop_name.is_empty() || username.is_empty() || password.is_empty() {
        return Ok(Registration::rejected("Please fill all fields"));
    }

    let tx = store.transaction()?;

    if tx.get_user(username)?.is_some() {
        return Ok(Registration::rejected("Username already exists"));
    }

    let shop_id = match tx.create_shop(shop_name) {
        Ok(id) => id,
        Err(StoreError::Conflict { .. }) => {
            return Ok(Registration::rejected("Shop name already exists"))
        }
        Err(e) => return Err(e.into()),
    };

    let hash = hash_password(password)?;
    match tx.create_user(username, &hash, shop_id) {
        Ok(_) => {}
        Err(StoreError::Conflict { .. }) => {
            return Ok(Registration::rejected("Failed to create user"))
        }
        Err(e) => return Err(e.into()),
    }

    tx.commit()?;
    tracing::info!(shop = %shop_id, shop_name, username, "registered shop");

    Ok(Registration::Created { shop_id })
}

/// Check credentials. Unknown user and wrong password both give `None`.
pub fn login_user(
    store: &Store,
    username: &str,
    password: &str,
) -> Result<Option<Session>, AuthError> {
    let Some(user) = store.get_user(username.trim())? else {
        tracing::warn!(username, "login for unknown user");
        return Ok(None);
    };

    if !verify_password(&user.password_hash, password) {
        tracing::warn!(username, "login rejected");
        return Ok(None);
    }

    Ok(Some(Session {
        user_id: user.id,
        username: user.username,
        shop_id: user.shop_id,
    }))
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password(stored_hash: &str, password: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable password hash");
            false
        }
    }
}
