use crate::message::Event;
use crate::router::EventRouter;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Turns domain events into pushes to the affected users' live connections.
pub struct RealtimeEventHandler {
    router: Arc<EventRouter>,
}

impl RealtimeEventHandler {
    pub fn new(router: Arc<EventRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventHandler for RealtimeEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::AccountDeleted { user_id } => {
                debug!("Handling AccountDeleted event for user {user_id}");

                let user_id = user_id.to_string();
                self.router.route(
                    &user_id,
                    &Event::ForceLogout {
                        reason: "account deleted".to_string(),
                    },
                );
                self.router.disconnect(&user_id);
            }
        }
    }
}
