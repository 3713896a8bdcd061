//! Text of the notices sent to admins, and the parser that reads a quoted
//! notice back. Both sides use the constants below and must change together.

use compact_str::CompactStr;

pub const FRIEND_MARKER: &str = "【好友申请】";
pub const GROUP_MARKER: &str = "【群邀请】";
pub const FRIEND_ID_LABEL: &str = "申请ID:";
pub const GROUP_ID_LABEL: &str = "邀请ID:";
pub const APPROVE_KEYWORD: &str = "同意";
pub const REJECT_KEYWORD: &str = "拒绝";

const INSTRUCTIONS: &str = "请【引用】本条消息并回复：\n  同意  或  拒绝";

pub fn friend_request_notice(requester_id: &str, comment: &str, correlation_id: &str) -> String {
    format!(
        "{marker}\n申请人QQ: {requester}\n验证信息: {comment}\n{label} {id}\n{instructions}",
        marker = FRIEND_MARKER,
        requester = requester_id,
        comment = comment,
        label = FRIEND_ID_LABEL,
        id = correlation_id,
        instructions = INSTRUCTIONS,
    )
}

pub fn group_invite_notice(group_id: &str, inviter_id: &str, correlation_id: &str) -> String {
    format!(
        "{marker}\n群号: {group}\n邀请人QQ: {inviter}\n{label} {id}\n{instructions}",
        marker = GROUP_MARKER,
        group = group_id,
        inviter = inviter_id,
        label = GROUP_ID_LABEL,
        id = correlation_id,
        instructions = INSTRUCTIONS,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    FriendRequest,
    GroupInvite,
}

impl NoticeKind {
    fn label(&self) -> &'static str {
        match self {
            NoticeKind::FriendRequest => FRIEND_ID_LABEL,
            NoticeKind::GroupInvite => GROUP_ID_LABEL,
        }
    }

    pub fn nickname(&self) -> &'static str {
        match self {
            NoticeKind::FriendRequest => "好友申请",
            NoticeKind::GroupInvite => "群邀请",
        }
    }
}

/// A notice recognised inside quoted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub correlation_id: CompactStr,
}

impl Notice {
    pub fn parse(quoted: &str) -> Option<Notice> {
        let kind = if quoted.contains(FRIEND_MARKER) {
            NoticeKind::FriendRequest
        } else if quoted.contains(GROUP_MARKER) {
            NoticeKind::GroupInvite
        } else {
            return None;
        };

        let label = kind.label();
        quoted
            .lines()
            .find(|line| line.starts_with(label))
            .and_then(|line| line.split_once(':'))
            .map(|(_, id)| id.trim())
            .filter(|id| !id.is_empty())
            .map(|id| Notice {
                kind,
                correlation_id: CompactStr::new(id),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Approve wins when both keywords are present.
    pub fn from_body(body: &str) -> Option<Decision> {
        if body.contains(APPROVE_KEYWORD) {
            Some(Decision::Approve)
        } else if body.contains(REJECT_KEYWORD) {
            Some(Decision::Reject)
        } else {
            None
        }
    }

    pub fn is_approve(&self) -> bool {
        matches!(self, Decision::Approve)
    }

    pub fn nickname(&self) -> &'static str {
        match self {
            Decision::Approve => "同意",
            Decision::Reject => "拒绝",
        }
    }
}
