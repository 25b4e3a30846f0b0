use domain::user::Registration;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterParams {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Public key generated on the registering device
    pub public_key: String,
}

impl From<RegisterParams> for Registration {
    fn from(params: RegisterParams) -> Self {
        Registration {
            username: params.username,
            email: params.email,
            password: params.password,
            public_key: params.public_key,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginParams {
    pub email: String,
    pub password: String,
}
