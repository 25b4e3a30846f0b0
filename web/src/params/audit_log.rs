use domain::audit_log::NewAuditLog;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAuditLogParams {
    pub event_type: String,
    pub chat_id: Option<String>,
    pub device_info: Option<String>,
}

impl From<CreateAuditLogParams> for NewAuditLog {
    fn from(params: CreateAuditLogParams) -> Self {
        NewAuditLog {
            event_type: params.event_type,
            chat_id: params.chat_id,
            device_info: params.device_info,
        }
    }
}
