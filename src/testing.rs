use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::actuator::{Actuator, ActuatorError, Notifier};
use crate::config::Config;

pub fn admin_config(admins: &[&str]) -> Config {
    let vars = HashMap::from([("admins", admins.join(","))]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FriendRequest(String, bool),
    GroupInvite(String, bool),
    DeleteFriend(String),
    BanUser(String, bool),
}

#[derive(Debug, Clone)]
enum Mode {
    Ok,
    Fail(String),
    Unsupported,
}

/// Records every call; answers according to its mode.
#[derive(Debug)]
pub struct FakeActuator {
    calls: Mutex<Vec<Call>>,
    mode: Mutex<Mode>,
}

impl Default for FakeActuator {
    fn default() -> Self {
        FakeActuator {
            calls: Mutex::new(Vec::new()),
            mode: Mutex::new(Mode::Ok),
        }
    }
}

impl FakeActuator {
    pub fn failing(reason: &str) -> Self {
        let actuator = FakeActuator::default();
        *actuator.mode.lock().unwrap() = Mode::Fail(reason.to_owned());
        actuator
    }

    pub fn unsupported() -> Self {
        let actuator = FakeActuator::default();
        *actuator.mode.lock().unwrap() = Mode::Unsupported;
        actuator
    }

    pub fn recover(&self) {
        *self.mode.lock().unwrap() = Mode::Ok;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn call(&self, call: Call) -> Result<(), ActuatorError> {
        self.calls.lock().unwrap().push(call);
        match &*self.mode.lock().unwrap() {
            Mode::Ok => Ok(()),
            Mode::Fail(reason) => Err(ActuatorError::Failed(reason.clone())),
            Mode::Unsupported => Err(ActuatorError::Unsupported("测试")),
        }
    }
}

#[async_trait]
impl Actuator for FakeActuator {
    async fn friend_request(&self, token: &str, approve: bool) -> Result<(), ActuatorError> {
        self.call(Call::FriendRequest(token.to_owned(), approve))
    }

    async fn group_invite(&self, token: &str, approve: bool) -> Result<(), ActuatorError> {
        self.call(Call::GroupInvite(token.to_owned(), approve))
    }

    async fn delete_friend(&self, target: &str) -> Result<(), ActuatorError> {
        self.call(Call::DeleteFriend(target.to_owned()))
    }

    async fn ban_user(&self, target: &str, enable: bool) -> Result<(), ActuatorError> {
        self.call(Call::BanUser(target.to_owned(), enable))
    }
}

/// Collects private messages, refusing the targets listed in `unreachable`.
#[derive(Debug, Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    pub unreachable: Vec<String>,
}

impl FakeNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        let mut sent = self.sent.lock().unwrap().clone();
        sent.sort();
        sent
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send_private(&self, target: &str, text: &str) -> anyhow::Result<()> {
        if self.unreachable.iter().any(|t| t == target) {
            anyhow::bail!("{} is offline", target);
        }
        self.sent
            .lock()
            .unwrap()
            .push((target.to_owned(), text.to_owned()));
        Ok(())
    }
}
