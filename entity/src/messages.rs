use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored end-to-end encrypted message. The ciphertext, IV and sender key are
/// opaque to the server.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::messages::Model)] // OpenAPI schema
#[sea_orm(schema_name = "securechat", table_name = "messages")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    #[schema(value_type = String, format = Uuid)]
    pub sender_id: Id,
    #[schema(value_type = String, format = Uuid)]
    pub receiver_id: Id,
    #[sea_orm(column_type = "Text")]
    pub encrypted_content: String,
    pub iv: String,
    #[sea_orm(column_type = "Text")]
    pub sender_public_key: String,
    #[schema(value_type = String, format = DateTime)] // Applies to OpenAPI schema
    pub timestamp: DateTimeWithTimeZone,
    pub is_delivered: bool,
    pub is_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReceiverId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}
