use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use proc_qq::re_exports::ricq::Client;
use proc_qq::MessageChainParseTrait;

use crate::actuator::{Actuator, ActuatorError, Notifier};

#[derive(Debug, thiserror::Error)]
#[error("malformed request token {0:?}")]
pub struct TokenError(String);

fn fields<const N: usize>(token: &str) -> Result<[i64; N], TokenError> {
    let mut out = [0i64; N];
    let mut parts = token.split('.');
    for slot in out.iter_mut() {
        *slot = parts
            .next()
            .and_then(|part| part.parse().ok())
            .ok_or_else(|| TokenError(token.to_owned()))?;
    }
    match parts.next() {
        Some(_) => Err(TokenError(token.to_owned())),
        None => Ok(out),
    }
}

/// What ricq needs to answer a friend request later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendToken {
    pub msg_seq: i64,
    pub req_uin: i64,
}

impl fmt::Display for FriendToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.msg_seq, self.req_uin)
    }
}

impl FromStr for FriendToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [msg_seq, req_uin] = fields::<2>(s)?;
        Ok(FriendToken { msg_seq, req_uin })
    }
}

/// What ricq needs to answer a group system message later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupToken {
    pub msg_seq: i64,
    pub req_uin: i64,
    pub group_code: i64,
    pub suspicious: bool,
}

impl fmt::Display for GroupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.msg_seq, self.req_uin, self.group_code, self.suspicious as u8
        )
    }
}

impl FromStr for GroupToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [msg_seq, req_uin, group_code, suspicious] = fields::<4>(s)?;
        Ok(GroupToken {
            msg_seq,
            req_uin,
            group_code,
            suspicious: suspicious != 0,
        })
    }
}

fn uin(target: &str) -> Result<i64, ActuatorError> {
    target
        .trim()
        .parse()
        .map_err(|_| ActuatorError::Failed(format!("无效的QQ号 {}", target)))
}

fn failed(err: impl fmt::Display) -> ActuatorError {
    ActuatorError::Failed(err.to_string())
}

pub struct RicqActuator {
    client: Arc<Client>,
}

impl RicqActuator {
    pub fn new(client: Arc<Client>) -> Self {
        RicqActuator { client }
    }
}

#[async_trait]
impl Actuator for RicqActuator {
    async fn friend_request(&self, token: &str, approve: bool) -> Result<(), ActuatorError> {
        let token = token.parse::<FriendToken>().map_err(failed)?;
        self.client
            .solve_friend_system_message(token.msg_seq, token.req_uin, approve)
            .await
            .map_err(failed)
    }

    /// Always answered as an invitation, the QQ side of the "add" sub type.
    async fn group_invite(&self, token: &str, approve: bool) -> Result<(), ActuatorError> {
        let token = token.parse::<GroupToken>().map_err(failed)?;
        self.client
            .solve_group_system_message(
                token.msg_seq,
                token.req_uin,
                token.group_code,
                token.suspicious,
                true,
                approve,
                false,
                String::new(),
            )
            .await
            .map_err(failed)
    }

    async fn delete_friend(&self, target: &str) -> Result<(), ActuatorError> {
        self.client.delete_friend(uin(target)?).await.map_err(failed)
    }

    async fn ban_user(&self, _target: &str, _enable: bool) -> Result<(), ActuatorError> {
        // ricq has no friend blacklist packet
        Err(ActuatorError::Unsupported("拉黑"))
    }
}

pub struct RicqNotifier {
    client: Arc<Client>,
}

impl RicqNotifier {
    pub fn new(client: Arc<Client>) -> Self {
        RicqNotifier { client }
    }
}

#[async_trait]
impl Notifier for RicqNotifier {
    async fn send_private(&self, target: &str, text: &str) -> anyhow::Result<()> {
        let target = target.parse::<i64>()?;
        self.client
            .send_friend_message(target, text.parse_message_chain())
            .await?;
        Ok(())
    }
}
