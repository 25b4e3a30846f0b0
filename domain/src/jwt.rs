//! Access token issuance.
//!
//! Tokens are signed with the same [`IdentityVerifier`] that authenticates
//! WebSocket connections, so one credential works for HTTP and real-time traffic.

use crate::error::Error;
use crate::Id;
use log::*;
use realtime::identity::IdentityVerifier;

// re-export the Jwt struct from the entity module
pub use entity::jwt::Jwt;

/// Issue an access token whose subject is `user_id`.
pub fn issue(verifier: &IdentityVerifier, user_id: Id) -> Result<Jwt, Error> {
    let sub = user_id.to_string();
    let token = verifier.issue(&sub).map_err(|e| {
        warn!("Failed to sign access token for user {user_id}: {e}");
        Error::from(e)
    })?;

    Ok(Jwt { token, sub })
}
