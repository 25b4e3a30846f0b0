use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Part of a username or email address, at least two characters
    pub q: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteAccountParams {
    pub password: String,
    /// Must be exactly `DELETE`
    pub confirmation_text: String,
}
