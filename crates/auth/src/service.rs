use std::sync::Arc;

use crate::{
    error::{AuthError, Result},
    jwt::TokenService,
    model::{Role, User},
    password::{hash_password, verify_password},
    store::UserStore,
};

/// Registration and login on top of a [`UserStore`]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    ///
    /// # Arguments
    /// * `users` - Credential store
    /// * `tokens` - Token service used to sign login tokens
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new user. No token is issued.
    ///
    /// Empty `email` or `password` count as absent. An absent or empty
    /// `role` defaults to Agent; any other value must name a known role.
    pub async fn register(&self, email: &str, password: &str, role: Option<&str>) -> Result<User> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let role = match role {
            None | Some("") => Role::default(),
            Some(name) => Role::parse(name).ok_or_else(|| AuthError::InvalidRole(name.to_string()))?,
        };

        self.register_with_role(email, password, role).await
    }

    /// Register a new user with specified role
    pub async fn register_with_role(&self, email: &str, password: &str, role: Role) -> Result<User> {
        if self.users.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let user = User::new(email.to_string(), password_hash, role);

        // Two concurrent registrations can both pass the lookup above.
        self.users.insert_user(&user).await.map_err(|e| {
            if e.is_unique_violation() {
                AuthError::EmailTaken
            } else {
                AuthError::Store(e)
            }
        })?;

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Login a user and return a signed token with the user record
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User)> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "login rejected: invalid password");
            return Err(AuthError::InvalidPassword);
        }

        let token = self.tokens.issue(&user.id, user.role)?;

        tracing::info!(user_id = %user.id, role = %user.role, "login successful");
        Ok((token, user))
    }

    /// Create `email` with `role` unless an account already uses it.
    ///
    /// Returns the created user, or `None` when the email was taken.
    pub async fn ensure_user(&self, email: &str, password: &str, role: Role) -> Result<Option<User>> {
        match self.register_with_role(email, password, role).await {
            Ok(user) => Ok(Some(user)),
            Err(AuthError::EmailTaken) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
