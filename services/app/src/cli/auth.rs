//! services/app/src/cli/auth.rs
//!
//! Session commands: login, guest login, signup, logout, plus the profile and
//! onboarding flag that hang off the signed-in user.

use crate::cli::{print_json, state::AppState};
use crate::error::AppError;
use tracing::info;

fn require_filled(fields: &[&str]) -> Result<(), AppError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::InvalidInput("Please fill in all fields.".to_string()));
    }
    Ok(())
}

/// Checks signup input before anything is sent.
pub fn validate_signup(email: &str, username: &str, password: &str, confirm: &str) -> Result<(), AppError> {
    require_filled(&[email, username, password, confirm])?;
    if password != confirm {
        return Err(AppError::InvalidInput("Passwords do not match.".to_string()));
    }
    Ok(())
}

pub async fn login(state: &AppState, email: &str, password: &str) -> Result<(), AppError> {
    let (email, password) = (email.trim(), password.trim());
    require_filled(&[email, password])?;

    state.client.login(email, password).await?;
    println!("Logged in successfully!");
    Ok(())
}

pub async fn guest(state: &AppState) -> Result<(), AppError> {
    state.client.guest_login().await?;
    println!("Continuing as guest.");
    Ok(())
}

pub async fn signup(
    state: &AppState,
    email: &str,
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), AppError> {
    validate_signup(email, username, password, confirm)?;

    state.client.signup(email.trim(), username.trim(), password).await?;
    println!("Account created!");
    Ok(())
}

pub async fn logout(state: &AppState) -> Result<(), AppError> {
    state.client.logout().await;
    println!("Logged out.");
    Ok(())
}

pub async fn profile(state: &AppState) -> Result<(), AppError> {
    let profile = state.client.get_user_profile().await?;
    print_json(&profile)
}

pub async fn onboarding(state: &AppState, complete: bool, reset: bool) -> Result<(), AppError> {
    if complete {
        state.onboarding.mark_completed().await?;
        info!("Onboarding marked complete");
    } else if reset {
        state.onboarding.reset().await?;
        info!("Onboarding flag cleared");
    }

    let done = state.onboarding.is_completed().await?;
    println!("Onboarding completed: {}", done);
    Ok(())
}
