use std::collections::HashMap;

use compact_str::CompactStr;
use time::{Duration, OffsetDateTime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFriendRequest {
    pub correlation_id: CompactStr,
    pub requester_id: CompactStr,
    pub comment: CompactStr,
    pub token: CompactStr,
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGroupInvite {
    pub correlation_id: CompactStr,
    pub group_id: CompactStr,
    pub inviter_id: CompactStr,
    pub token: CompactStr,
    pub recorded_at: OffsetDateTime,
}

pub fn friend_correlation_id(requester_id: &str, token: &str) -> CompactStr {
    CompactStr::new(format!("{}_{}", requester_id, token))
}

pub fn group_correlation_id(group_id: &str, inviter_id: &str, token: &str) -> CompactStr {
    CompactStr::new(format!("{}_{}_{}", group_id, inviter_id, token))
}

/// Pending friend requests and group invites, keyed by correlation id.
///
/// Nothing here is persisted: a restart forgets every pending request, and
/// the admins have to handle those from the QQ client directly.
#[derive(Debug, Default)]
pub struct Registry {
    friends: HashMap<CompactStr, PendingFriendRequest>,
    groups: HashMap<CompactStr, PendingGroupInvite>,
    ttl: Option<Duration>,
}

impl Registry {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` keeps entries until they are resolved.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    pub fn record_friend_request(
        &mut self,
        requester_id: &str,
        comment: &str,
        token: &str,
    ) -> CompactStr {
        let correlation_id = friend_correlation_id(requester_id, token);
        self.friends.insert(
            correlation_id.clone(),
            PendingFriendRequest {
                correlation_id: correlation_id.clone(),
                requester_id: CompactStr::new(requester_id),
                comment: CompactStr::new(comment),
                token: CompactStr::new(token),
                recorded_at: OffsetDateTime::now_utc(),
            },
        );
        correlation_id
    }

    pub fn record_group_invite(&mut self, group_id: &str, inviter_id: &str, token: &str) -> CompactStr {
        let correlation_id = group_correlation_id(group_id, inviter_id, token);
        self.groups.insert(
            correlation_id.clone(),
            PendingGroupInvite {
                correlation_id: correlation_id.clone(),
                group_id: CompactStr::new(group_id),
                inviter_id: CompactStr::new(inviter_id),
                token: CompactStr::new(token),
                recorded_at: OffsetDateTime::now_utc(),
            },
        );
        correlation_id
    }

    pub fn friend_request(&self, correlation_id: &str) -> Option<&PendingFriendRequest> {
        self.friends.get(&CompactStr::new(correlation_id))
    }

    pub fn group_invite(&self, correlation_id: &str) -> Option<&PendingGroupInvite> {
        self.groups.get(&CompactStr::new(correlation_id))
    }

    pub fn remove_friend_request(&mut self, correlation_id: &str) -> Option<PendingFriendRequest> {
        self.friends.remove(&CompactStr::new(correlation_id))
    }

    pub fn remove_group_invite(&mut self, correlation_id: &str) -> Option<PendingGroupInvite> {
        self.groups.remove(&CompactStr::new(correlation_id))
    }

    pub fn friend_requests_len(&self) -> usize {
        self.friends.len()
    }

    pub fn group_invites_len(&self) -> usize {
        self.groups.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.friends.is_empty() && self.groups.is_empty()
    }

    /// Drops every entry older than the configured ttl, returns how many went.
    pub fn purge_expired(&mut self, now: OffsetDateTime) -> usize {
        let ttl = match self.ttl {
            Some(ttl) => ttl,
            None => return 0,
        };
        let before = self.friends.len() + self.groups.len();
        self.friends.retain(|_, req| now - req.recorded_at < ttl);
        self.groups.retain(|_, inv| now - inv.recorded_at < ttl);
        before - self.friends.len() - self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_then_lookup_friend_request() {
        let mut registry = Registry::new();
        let id = registry.record_friend_request("111", "hello", "flagA");
        assert_eq!(id, "111_flagA");

        let req = registry.friend_request(&id).unwrap();
        assert_eq!(req.correlation_id, "111_flagA");
        assert_eq!(req.requester_id, "111");
        assert_eq!(req.comment, "hello");
        assert_eq!(req.token, "flagA");
    }

    #[test]
    fn group_invite_id_includes_inviter() {
        let mut registry = Registry::new();
        let id = registry.record_group_invite("9000", "111", "flagB");
        assert_eq!(id, "9000_111_flagB");

        let inv = registry.group_invite(&id).unwrap();
        assert_eq!(inv.group_id, "9000");
        assert_eq!(inv.inviter_id, "111");
        assert_eq!(inv.token, "flagB");
        assert!(registry.friend_request(&id).is_none());
    }

    #[test]
    fn same_token_overwrites() {
        let mut registry = Registry::new();
        registry.record_friend_request("111", "first", "flagA");
        let id = registry.record_friend_request("111", "second", "flagA");

        assert_eq!(registry.friend_requests_len(), 1);
        assert_eq!(registry.friend_request(&id).unwrap().comment, "second");
    }

    #[test]
    fn different_tokens_do_not_collide() {
        let mut registry = Registry::new();
        let a = registry.record_friend_request("111", "", "flagA");
        let b = registry.record_friend_request("111", "", "flagB");

        assert_ne!(a, b);
        assert_eq!(registry.friend_requests_len(), 2);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = Registry::new();
        let id = registry.record_friend_request("111", "", "flagA");

        assert!(registry.remove_friend_request(&id).is_some());
        assert!(registry.friend_request(&id).is_none());
        assert!(registry.remove_friend_request(&id).is_none());
        assert!(registry.remove_group_invite("nope").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_fields_are_recorded_as_empty() {
        let mut registry = Registry::new();
        let id = registry.record_friend_request("", "", "");
        assert_eq!(id, "_");
        assert_eq!(registry.friend_request("_").unwrap().requester_id, "");
    }

    #[test]
    fn purge_without_ttl_keeps_everything() {
        let mut registry = Registry::new();
        registry.record_friend_request("111", "", "flagA");
        let later = OffsetDateTime::now_utc() + Duration::days(365);
        assert_eq!(registry.purge_expired(later), 0);
        assert_eq!(registry.friend_requests_len(), 1);
    }

    #[test]
    fn purge_drops_expired_entries() {
        let mut registry = Registry::with_ttl(Some(Duration::minutes(10)));
        registry.record_friend_request("111", "", "flagA");
        registry.record_group_invite("9000", "111", "flagB");

        let now = OffsetDateTime::now_utc();
        assert_eq!(registry.purge_expired(now), 0);
        assert_eq!(registry.purge_expired(now + Duration::minutes(11)), 2);
        assert!(registry.is_empty());
    }
}
