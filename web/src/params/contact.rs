use domain::Id;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddContactParams {
    #[schema(value_type = String, format = Uuid)]
    pub contact_id: Id,
}
