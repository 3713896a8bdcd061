use compact_str::CompactStr;

/// A request the bot received from the platform, already taken apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestEvent {
    Friend {
        requester_id: CompactStr,
        comment: CompactStr,
        token: CompactStr,
    },
    GroupInvite {
        group_id: CompactStr,
        inviter_id: CompactStr,
        token: CompactStr,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// `None` when the transport does not say who wrote the quoted message.
    pub sender_id: Option<CompactStr>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender_id: CompactStr,
    pub body: String,
    pub quote: Option<Quote>,
}

impl InboundMessage {
    pub fn new(sender_id: impl AsRef<str>, body: impl Into<String>) -> Self {
        InboundMessage {
            sender_id: CompactStr::new(sender_id),
            body: body.into(),
            quote: None,
        }
    }

    pub fn quoting(mut self, sender_id: Option<&str>, text: impl Into<String>) -> Self {
        self.quote = Some(Quote {
            sender_id: sender_id.map(CompactStr::new),
            text: text.into(),
        });
        self
    }
}
