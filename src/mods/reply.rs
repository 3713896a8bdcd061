use proc_qq::{
    event, module, MessageChainParseTrait, MessageContentTrait, MessageEvent,
    MessageSendToSourceTrait, Module,
};

use crate::event::InboundMessage;
use crate::qq::RicqActuator;

#[event]
async fn admin_message(event: &MessageEvent) -> anyhow::Result<bool> {
    let (client, sender, elements) = match event {
        MessageEvent::FriendMessage(e) => (&e.client, e.inner.from_uin, &e.inner.elements),
        MessageEvent::GroupMessage(e) => (&e.client, e.inner.from_uin, &e.inner.elements),
        _ => return Ok(false),
    };
    let manager = super::manager()?;

    let mut message = InboundMessage::new(sender.to_string(), event.message_content());
    if let Some(reply) = elements.reply() {
        let sender = reply.sender.to_string();
        message = message.quoting(Some(&sender), reply.elements.to_string());
    }

    match manager
        .on_message(&RicqActuator::new(client.clone()), &message)
        .await
    {
        Some(answer) => {
            event
                .send_message_to_source(answer.parse_message_chain())
                .await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub fn module() -> Module {
    module!("reply", "审批", admin_message)
}
