use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
};

/// Rejects requests that touch another user's resources. `resource_owner`
/// is a username, matching how user routes address resources.
pub fn require_owner(claims: &Claims, resource_owner: &str) -> AppResult<()> {
    if claims.username != resource_owner {
        return Err(AppError::Unauthorized(
            "You can only access your own resources".to_string(),
        ));
    }
    Ok(())
}
