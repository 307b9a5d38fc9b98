use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{password::verify_password, JwtService},
    errors::{AppError, AppResult},
    models::{
        domain::{refresh_token::hash_token, RefreshToken, User},
        dto::request::LoginRequest,
    },
    repositories::{RefreshTokenRepository, UserRepository},
};

/// A freshly issued access/refresh pair together with the user it belongs to.
#[derive(Debug)]
pub struct IssuedTokens {
    pub token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Credential checks and refresh-token lifecycle. Access tokens are
/// stateless JWTs; refresh tokens are additionally recorded by hash so they
/// can be revoked and are rotated on every use.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        jwt: JwtService,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt,
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> AppResult<IssuedTokens> {
        request.validate()?;

        // One message for both failure modes; don't reveal which part failed.
        let invalid =
            || AppError::Unauthorized("Invalid username or password".to_string());

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(invalid());
        }

        let tokens = self.issue_tokens(user).await?;
        log::info!("User '{}' logged in", tokens.user.username);

        Ok(tokens)
    }

    /// Exchanges a valid refresh token for a new pair. The presented token is
    /// revoked in the same step, so each refresh token works exactly once.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<IssuedTokens> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;

        let presented_hash = hash_token(refresh_token);
        let stored = self
            .refresh_tokens
            .find_by_token_hash(&presented_hash)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("Refresh token is not recognized".to_string())
            })?;

        if !stored.is_valid() {
            return Err(AppError::Unauthorized(
                "Refresh token has been revoked or has expired".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "User associated with refresh token not found".to_string(),
                )
            })?;

        self.refresh_tokens
            .revoke_by_token_hash(&presented_hash)
            .await?;

        let tokens = self.issue_tokens(user).await?;
        log::info!("Rotated refresh token for user '{}'", tokens.user.username);

        Ok(tokens)
    }

    /// Revokes the presented refresh token; with `all_devices`, every live
    /// token of that user goes with it.
    pub async fn logout(&self, refresh_token: &str, all_devices: bool) -> AppResult<()> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;

        self.refresh_tokens
            .revoke_by_token_hash(&hash_token(refresh_token))
            .await?;

        if all_devices {
            let user = self
                .users
                .find_by_username(&claims.sub)
                .await?
                .ok_or_else(|| {
                    AppError::Unauthorized(
                        "User associated with refresh token not found".to_string(),
                    )
                })?;

            let revoked = self
                .refresh_tokens
                .revoke_all_for_user(&user.subject())
                .await?;
            log::info!(
                "Revoked {} refresh tokens for user '{}'",
                revoked,
                user.username
            );
        }

        Ok(())
    }

    async fn issue_tokens(&self, user: User) -> AppResult<IssuedTokens> {
        let token = self.jwt.create_token(&user)?;
        let refresh_token = self.jwt.create_refresh_token(&user.username)?;

        let record = RefreshToken::issue(
            &user.subject(),
            &refresh_token,
            self.jwt.refresh_expiration_hours(),
        );
        self.refresh_tokens.create(record).await?;

        Ok(IssuedTokens {
            token,
            refresh_token,
            user,
        })
    }
}
