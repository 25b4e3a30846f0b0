use crate::error::Error;
use crate::{audit_logs, Id};
use entity_api::audit_log;
use sea_orm::DatabaseConnection;

/// A client reported security event, such as a key exchange.
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub event_type: String,
    pub chat_id: Option<String>,
    pub device_info: Option<String>,
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Id,
    new_audit_log: NewAuditLog,
) -> Result<audit_logs::Model, Error> {
    let model = audit_logs::Model {
        id: Id::nil(),
        user_id,
        event_type: new_audit_log.event_type,
        chat_id: new_audit_log.chat_id,
        device_info: new_audit_log.device_info,
        timestamp: chrono::Utc::now().into(),
    };

    Ok(audit_log::create(db, model, user_id).await?)
}

pub async fn find_by_user(
    db: &DatabaseConnection,
    user_id: Id,
    limit: u64,
) -> Result<Vec<audit_logs::Model>, Error> {
    Ok(audit_log::find_by_user(db, user_id, limit).await?)
}
