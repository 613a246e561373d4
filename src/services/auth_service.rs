// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::User,
    store::AttendanceStore,
};

/// Checks a password against the stored bcrypt hash.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verifying bcrypt hash...");
        bcrypt::verify(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("spawn_blocking task failed (verify_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("bcrypt error while verifying password: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Hashes a password with bcrypt.
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Generating bcrypt hash...");
        bcrypt::hash(&password, bcrypt::DEFAULT_COST)
    })
    .await
    .map_err(|e| {
        tracing::error!("spawn_blocking task failed (hash_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("bcrypt error while hashing password: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Finds the user by student id and checks the password.
/// Unknown ids and wrong passwords give the same error.
pub async fn login(
    store: &dyn AttendanceStore,
    student_id: &str,
    password: &str,
) -> AppResult<User> {
    let Some(user) = store.find_user_by_student_id(student_id).await? else {
        tracing::debug!("Login failed: unknown student id '{}'.", student_id);
        return Err(AppError::InvalidCredentials);
    };

    // A malformed stored hash is treated like a wrong password
    let matches = match verify_password(password, &user.password_hash).await {
        Ok(matches) => matches,
        Err(AppError::PasswordHashingError) => false,
        Err(e) => return Err(e),
    };
    if !matches {
        tracing::debug!("Login failed: wrong password for '{}'.", student_id);
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!("User '{}' logged in.", student_id);
    Ok(user)
}
