use auth::{AuthService, Result, Role};
use stockroom_core::SeedConfig;

/// Ensure the configured SuperAdmin account exists.
///
/// Does nothing when no seed credentials are configured, and never touches
/// an existing account with the same email.
pub async fn seed_database(auth_service: &AuthService, seed: &SeedConfig) -> Result<()> {
    let Some((email, password)) = seed.admin_credentials() else {
        tracing::debug!("no seed admin configured");
        return Ok(());
    };

    match auth_service.ensure_user(email, password, Role::SuperAdmin).await? {
        Some(user) => {
            tracing::info!(email = %user.email, user_id = %user.id, "seeded SuperAdmin account");
        }
        None => {
            tracing::info!(email = %email, "seed admin already exists");
        }
    }

    Ok(())
}
