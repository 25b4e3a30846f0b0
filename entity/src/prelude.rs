pub use super::audit_logs::Entity as AuditLogs;
pub use super::contacts::Entity as Contacts;
pub use super::messages::Entity as Messages;
pub use super::users::Entity as Users;
