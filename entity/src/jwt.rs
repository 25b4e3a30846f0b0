use serde::Serialize;
use utoipa::ToSchema;

/// Represents a JSON Web Token (JWT) issued to a user.
/// Note: This struct does not have a corresponding entity in the database.
///
/// - `token`: the signed access token.
/// - `sub`: the subject of the token (the user id), for conveniently accessing
///   the subject without having to decode the JWT.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[schema(as = entity::jwt::Jwt)] // OpenAPI schema
pub struct Jwt {
    pub token: String,
    pub sub: String,
}
