//! Admin accounts: login, listing, creation and removal.

use serde::Deserialize;

use crate::auth::password;
use crate::errors::{ApiError, Result};
use crate::models::user::{NewUser, User};
use crate::models::{fits_column, NAME_MAX_LEN};
use crate::services::query_service::is_valid_email;
use crate::store::{Store, StoreError};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const DEFAULT_ADMIN_NAME: &str = "Admin";

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash on the blocking pool.
pub async fn hash_password(plain: String) -> Result<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task: {e}"))?
}

async fn verify_password(plain: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(|e| anyhow::anyhow!("password verification task: {e}"))?
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Check credentials. Every failure yields the same 401 message.
pub async fn authenticate(store: &dyn Store, form: LoginForm) -> Result<User> {
    let invalid = || ApiError::Unauthenticated {
        message: INVALID_CREDENTIALS.to_string(),
    };

    let email = normalize_email(&form.email);
    if email.is_empty() || form.password.is_empty() {
        crate::metrics::login_attempt("failure");
        return Err(invalid());
    }

    let Some(user) = store.find_user_by_email(&email).await? else {
        crate::metrics::login_attempt("failure");
        tracing::info!(email = %email, "Login for unknown admin");
        return Err(invalid());
    };

    if !verify_password(form.password, user.password_hash.clone()).await? {
        crate::metrics::login_attempt("failure");
        tracing::info!(email = %email, "Login with wrong password");
        return Err(invalid());
    }

    crate::metrics::login_attempt("success");
    tracing::info!(email = %email, "Admin logged in");
    Ok(user)
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct NewAdminForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewAdminForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::bad_request("Name is required"));
        }
        if !fits_column(self.name.trim(), NAME_MAX_LEN) {
            return Err(ApiError::bad_request(format!(
                "Name must be at most {NAME_MAX_LEN} characters"
            )));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ApiError::bad_request("Invalid email address"));
        }
        if !fits_column(self.email.trim(), NAME_MAX_LEN) {
            return Err(ApiError::bad_request(format!(
                "Email must be at most {NAME_MAX_LEN} characters"
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::bad_request(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

pub async fn list_admins(store: &dyn Store) -> Result<Vec<User>> {
    Ok(store.list_users().await?)
}

pub async fn create_admin(store: &dyn Store, form: NewAdminForm) -> Result<User> {
    form.validate()?;
    let email = normalize_email(&form.email);
    let duplicate = || ApiError::bad_request("An admin with this email already exists");

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(duplicate());
    }

    let hash = hash_password(form.password).await?;
    match store.insert_user(NewUser::new(email, form.name.trim(), hash)).await {
        Ok(user) => {
            tracing::info!(email = %user.email, "Admin created");
            Ok(user)
        }
        Err(StoreError::Conflict { .. }) => Err(duplicate()),
        Err(e) => Err(e.into()),
    }
}

/// Create the admin or reset the password of an existing one.
pub async fn upsert_admin(store: &dyn Store, email: &str, password: &str, name: &str) -> Result<User> {
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }
    if !fits_column(&email, NAME_MAX_LEN) || !fits_column(name, NAME_MAX_LEN) {
        return Err(ApiError::bad_request(format!(
            "Email and name must be at most {NAME_MAX_LEN} characters"
        )));
    }
    let hash = hash_password(password.to_string()).await?;
    Ok(store.upsert_user(NewUser::new(email, name, hash)).await?)
}

/// Remove an admin. `current_email` is the caller, who may not remove
/// their own account.
pub async fn delete_admin(store: &dyn Store, current_email: &str, email: &str) -> Result<()> {
    let email = normalize_email(email);
    if email == normalize_email(current_email) {
        return Err(ApiError::bad_request("You cannot delete your own account"));
    }
    if !store.delete_user_by_email(&email).await? {
        return Err(ApiError::not_found("Admin not found"));
    }
    tracing::info!(email = %email, "Admin deleted");
    Ok(())
}
