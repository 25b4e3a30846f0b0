pub(crate) mod audit_log;
pub(crate) mod auth;
pub(crate) mod contact;
pub(crate) mod message;
pub(crate) mod user;
