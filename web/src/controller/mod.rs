pub(crate) mod audit_log_controller;
pub(crate) mod auth_controller;
pub(crate) mod contact_controller;
pub(crate) mod health_check_controller;
pub(crate) mod message_controller;
pub(crate) mod user_controller;
