use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("{0}")]
    Failed(String),
    #[error("当前平台不支持{0}")]
    Unsupported(&'static str),
}

/// Platform actions that resolve requests and manage friends.
///
/// Tokens are the opaque values carried by the request events; only the
/// implementation knows what is inside them.
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn friend_request(&self, token: &str, approve: bool) -> Result<(), ActuatorError>;

    async fn group_invite(&self, token: &str, approve: bool) -> Result<(), ActuatorError>;

    async fn delete_friend(&self, target: &str) -> Result<(), ActuatorError>;

    async fn ban_user(&self, target: &str, enable: bool) -> Result<(), ActuatorError>;
}

/// Private message delivery to a single user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_private(&self, target: &str, text: &str) -> anyhow::Result<()>;
}
