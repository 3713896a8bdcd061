use compact_str::CompactStr;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::actuator::{Actuator, Notifier};
use crate::config::Config;
use crate::correlator::Correlator;
use crate::event::{InboundMessage, RequestEvent};
use crate::notice::{friend_request_notice, group_invite_notice};
use crate::registry::Registry;

/// Pending requests plus the rules for resolving them.
///
/// The registry lock is held for a whole reply, actuator call included, so
/// two admins answering the same notice cannot both resolve it.
pub struct RequestManager {
    correlator: Correlator,
    registry: Mutex<Registry>,
}

impl RequestManager {
    pub fn new(config: &Config) -> Self {
        RequestManager {
            correlator: Correlator::new(config),
            registry: Mutex::new(Registry::with_ttl(config.request_ttl)),
        }
    }

    pub async fn on_request<N>(&self, notifier: &N, event: RequestEvent) -> CompactStr
    where
        N: Notifier + ?Sized,
    {
        let (correlation_id, text) = {
            let mut registry = self.registry.lock().await;
            match &event {
                RequestEvent::Friend {
                    requester_id,
                    comment,
                    token,
                } => {
                    let id = registry.record_friend_request(requester_id, comment, token);
                    let text = friend_request_notice(requester_id, comment, &id);
                    (id, text)
                }
                RequestEvent::GroupInvite {
                    group_id,
                    inviter_id,
                    token,
                } => {
                    let id = registry.record_group_invite(group_id, inviter_id, token);
                    let text = group_invite_notice(group_id, inviter_id, &id);
                    (id, text)
                }
            }
        };
        tracing::info!("recorded {:?} as {}", event, correlation_id);

        self.notify_admins(notifier, &text).await;
        correlation_id
    }

    async fn notify_admins<N>(&self, notifier: &N, text: &str)
    where
        N: Notifier + ?Sized,
    {
        let mut admins = self.correlator.admins().peekable();
        if admins.peek().is_none() {
            tracing::warn!("no admins configured, request notice dropped");
            return;
        }
        for admin in admins {
            if let Err(err) = notifier.send_private(admin, text).await {
                tracing::error!("notify admin {} error: {}", admin, err);
            }
        }
    }

    /// Text to answer the sender with, if the message meant anything to us.
    pub async fn on_message<A>(&self, actuator: &A, message: &InboundMessage) -> Option<String>
    where
        A: Actuator + ?Sized,
    {
        if !self.correlator.is_admin(&message.sender_id) {
            return None;
        }
        let mut registry = self.registry.lock().await;
        match self.correlator.dispatch(&mut registry, actuator, message).await {
            Ok(outcome) => outcome.map(|outcome| outcome.to_string()),
            Err(err) => {
                tracing::warn!("message from {} failed: {}", message.sender_id, err);
                Some(err.to_string())
            }
        }
    }

    pub async fn purge_expired(&self) -> usize {
        self.registry
            .lock()
            .await
            .purge_expired(OffsetDateTime::now_utc())
    }

    pub async fn pending(&self) -> (usize, usize) {
        let registry = self.registry.lock().await;
        (registry.friend_requests_len(), registry.group_invites_len())
    }
}
