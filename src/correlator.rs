use std::fmt;

use compact_str::CompactStr;
use itertools::Itertools;
use phf::phf_map;

use crate::actuator::{Actuator, ActuatorError};
use crate::config::Config;
use crate::event::InboundMessage;
use crate::notice::{Decision, Notice, NoticeKind};
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    DeleteFriend,
    Ban,
}

static COMMANDS: phf::Map<&'static str, Command> = phf_map! {
    "删除好友" => Command::DeleteFriend,
    "拉黑" => Command::Ban,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ResolveFriendRequest,
    ResolveGroupInvite,
    DeleteFriend,
    BanUser,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::ResolveFriendRequest => "处理好友申请",
            Action::ResolveGroupInvite => "处理群邀请",
            Action::DeleteFriend => "删除好友",
            Action::BanUser => "拉黑用户",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    FriendRequest {
        requester_id: CompactStr,
        decision: Decision,
    },
    GroupInvite {
        group_id: CompactStr,
        decision: Decision,
    },
    FriendDeleted(CompactStr),
    UserBanned(CompactStr),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::FriendRequest {
                requester_id,
                decision,
            } => write!(f, "已{}好友申请：{}", decision.nickname(), requester_id),
            Outcome::GroupInvite {
                group_id,
                decision: Decision::Approve,
            } => write!(f, "已同意群邀请：{}，bot 将加入该群。", group_id),
            Outcome::GroupInvite {
                group_id,
                decision: Decision::Reject,
            } => write!(f, "已拒绝群邀请：{}，bot 不会加入该群。", group_id),
            Outcome::FriendDeleted(target) => write!(f, "已删除好友：{}", target),
            Outcome::UserBanned(target) => write!(f, "已拉黑用户：{}", target),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("未找到对应的{}，可能已过期或已处理。", .0.nickname())]
    NotFound(NoticeKind),
    #[error("{action}失败: {reason}")]
    Actuator { action: Action, reason: String },
    #[error("当前平台不支持{capability}，无法{action}。")]
    Unsupported {
        action: Action,
        capability: &'static str,
    },
}

impl DispatchError {
    fn from_actuator(action: Action, err: ActuatorError) -> Self {
        match err {
            ActuatorError::Failed(reason) => DispatchError::Actuator { action, reason },
            ActuatorError::Unsupported(capability) => DispatchError::Unsupported { action, capability },
        }
    }
}

/// Turns admin messages into actuator calls.
///
/// A quote of one of our notices plus a decision keyword resolves the quoted
/// request; otherwise the message may be a `删除好友 <id>` or `拉黑 <id>`
/// command. Anything else, and anything from a non-admin, is `Ok(None)`.
pub struct Correlator {
    config: Config,
}

impl Correlator {
    pub fn new(config: &Config) -> Self {
        Correlator {
            config: config.clone(),
        }
    }

    pub fn admins(&self) -> impl Iterator<Item = &CompactStr> {
        self.config.admins.iter()
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.config.is_admin(user_id)
    }

    pub async fn dispatch<A>(
        &self,
        registry: &mut Registry,
        actuator: &A,
        message: &InboundMessage,
    ) -> Result<Option<Outcome>, DispatchError>
    where
        A: Actuator + ?Sized,
    {
        if !self.is_admin(&message.sender_id) {
            return Ok(None);
        }
        let body = message.body.trim();
        if body.is_empty() {
            return Ok(None);
        }

        if let Some(notice) = self.quoted_notice(message) {
            if let Some(decision) = Decision::from_body(body) {
                tracing::debug!(
                    "{} {} by {}",
                    decision.nickname(),
                    notice.correlation_id,
                    message.sender_id
                );
                return match notice.kind {
                    NoticeKind::FriendRequest => {
                        resolve_friend_request(registry, actuator, &notice.correlation_id, decision)
                            .await
                    }
                    NoticeKind::GroupInvite => {
                        resolve_group_invite(registry, actuator, &notice.correlation_id, decision)
                            .await
                    }
                }
                .map(Some);
            }
        }

        let (word, target) = match body.split_whitespace().collect_tuple::<(&str, &str)>() {
            Some(args) => args,
            None => return Ok(None),
        };
        match COMMANDS.get(word) {
            Some(Command::DeleteFriend) => {
                actuator
                    .delete_friend(target)
                    .await
                    .map_err(|err| DispatchError::from_actuator(Action::DeleteFriend, err))?;
                Ok(Some(Outcome::FriendDeleted(CompactStr::new(target))))
            }
            Some(Command::Ban) => {
                actuator
                    .ban_user(target, true)
                    .await
                    .map_err(|err| DispatchError::from_actuator(Action::BanUser, err))?;
                Ok(Some(Outcome::UserBanned(CompactStr::new(target))))
            }
            None => Ok(None),
        }
    }

    fn quoted_notice(&self, message: &InboundMessage) -> Option<Notice> {
        let quote = message.quote.as_ref()?;
        if let (Some(self_id), Some(sender)) = (&self.config.self_id, &quote.sender_id) {
            if self_id != sender {
                return None;
            }
        }
        Notice::parse(&quote.text)
    }
}

async fn resolve_friend_request<A>(
    registry: &mut Registry,
    actuator: &A,
    correlation_id: &str,
    decision: Decision,
) -> Result<Outcome, DispatchError>
where
    A: Actuator + ?Sized,
{
    let req = registry
        .friend_request(correlation_id)
        .cloned()
        .ok_or(DispatchError::NotFound(NoticeKind::FriendRequest))?;

    actuator
        .friend_request(&req.token, decision.is_approve())
        .await
        .map_err(|err| DispatchError::from_actuator(Action::ResolveFriendRequest, err))?;
    registry.remove_friend_request(correlation_id);

    tracing::info!("friend request {} {:?}", correlation_id, decision);
    Ok(Outcome::FriendRequest {
        requester_id: req.requester_id,
        decision,
    })
}

async fn resolve_group_invite<A>(
    registry: &mut Registry,
    actuator: &A,
    correlation_id: &str,
    decision: Decision,
) -> Result<Outcome, DispatchError>
where
    A: Actuator + ?Sized,
{
    let inv = registry
        .group_invite(correlation_id)
        .cloned()
        .ok_or(DispatchError::NotFound(NoticeKind::GroupInvite))?;

    actuator
        .group_invite(&inv.token, decision.is_approve())
        .await
        .map_err(|err| DispatchError::from_actuator(Action::ResolveGroupInvite, err))?;
    registry.remove_group_invite(correlation_id);

    tracing::info!("group invite {} {:?}", correlation_id, decision);
    Ok(Outcome::GroupInvite {
        group_id: inv.group_id,
        decision,
    })
}
