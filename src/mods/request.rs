use async_trait::async_trait;
use compact_str::CompactStr;
use proc_qq::re_exports::ricq::client::event::SelfInvitedEvent;
use proc_qq::{
    event, module, Module, ModuleEventHandler, ModuleEventProcess, NewFriendRequestEvent,
    SelfInvitedEventProcess,
};

use crate::event::RequestEvent;
use crate::qq::{FriendToken, GroupToken, RicqNotifier};

fn friend_request(msg_seq: i64, req_uin: i64, message: &str) -> RequestEvent {
    let token = FriendToken { msg_seq, req_uin };
    RequestEvent::Friend {
        requester_id: CompactStr::new(req_uin.to_string()),
        comment: CompactStr::new(message),
        token: CompactStr::new(token.to_string()),
    }
}

/// The invitor stands in for the requester when the invite is answered.
fn self_invite(msg_seq: i64, invitor_uin: i64, group_code: i64) -> RequestEvent {
    let token = GroupToken {
        msg_seq,
        req_uin: invitor_uin,
        group_code,
        suspicious: false,
    };
    RequestEvent::GroupInvite {
        group_id: CompactStr::new(group_code.to_string()),
        inviter_id: CompactStr::new(invitor_uin.to_string()),
        token: CompactStr::new(token.to_string()),
    }
}

#[event]
async fn new_friend(event: &NewFriendRequestEvent) -> anyhow::Result<bool> {
    let manager = super::manager()?;
    let inner = &event.inner;
    tracing::debug!("friend request from {} ({})", inner.req_uin, inner.req_nick);

    manager
        .on_request(
            &RicqNotifier::new(event.client.clone()),
            friend_request(inner.msg_seq, inner.req_uin, &inner.message),
        )
        .await;
    Ok(true)
}

/// The bot account itself was invited into a group.
///
/// Registered by hand, `#[event]` does not know this event type.
struct SelfInvited;

#[async_trait]
impl SelfInvitedEventProcess for SelfInvited {
    async fn handle(&self, event: &SelfInvitedEvent) -> anyhow::Result<bool> {
        let manager = super::manager()?;
        let inner = &event.inner;
        tracing::debug!(
            "invited to {} ({}) by {}",
            inner.group_code,
            inner.group_name,
            inner.invitor_uin
        );

        manager
            .on_request(
                &RicqNotifier::new(event.client.clone()),
                self_invite(inner.msg_seq, inner.invitor_uin, inner.group_code),
            )
            .await;
        Ok(true)
    }
}

pub fn module() -> Module {
    let mut module = module!("request", "申请", new_friend);
    module.handles.push(ModuleEventHandler {
        name: "self_invited".to_owned(),
        process: ModuleEventProcess::SelfInvited(Box::new(SelfInvited)),
    });
    module
}
