//! Business rules for SecureChat.
//!
//! `web` depends on this crate only. Storage goes through `entity_api`, real-time
//! pushes through `realtime`, and cross-cutting notifications through `events`.

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{audit_logs, contacts, messages, parse_id, users, Id};

pub use events::EventPublisher;
pub use realtime::identity::IdentityVerifier;

pub mod account;
pub mod audit_log;
pub mod contact;
pub mod error;
pub mod jwt;
pub mod message;
pub mod user;
