use domain::Id;
use realtime::message::EncryptedPayload;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageParams {
    #[schema(value_type = String, format = Uuid)]
    pub receiver_id: Id,
    pub encrypted_content: String,
    pub iv: String,
    pub sender_public_key: String,
}

impl SendMessageParams {
    pub(crate) fn into_parts(self) -> (Id, EncryptedPayload) {
        (
            self.receiver_id,
            EncryptedPayload {
                encrypted_content: self.encrypted_content,
                iv: self.iv,
                sender_public_key: self.sender_public_key,
            },
        )
    }
}
