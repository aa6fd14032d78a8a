//! Conversation turn assembly.

use brain_core::ChatMessage;
use database::{message, Database, Message, Settings};
use tracing::{debug, error};

use crate::commands::is_command;
use crate::error::{OrchestratorError, Result};

/// Build the message sequence for a completion on behalf of `sender`.
///
/// The stored history includes the message being answered, since inbound
/// messages are recorded before a reply is generated.
pub async fn build_turn(
    db: &Database,
    sender: &str,
    service_identity: &str,
    settings: &Settings,
) -> Result<Vec<ChatMessage>> {
    let history = message::list_messages_for(db.pool(), sender).await?;
    let turn = assemble(
        &history,
        sender,
        service_identity,
        settings.system_prompt.as_deref().unwrap_or_default(),
    )?;
    debug!("Built turn for {}: {} messages", sender, turn.len());
    Ok(turn)
}

/// Map stored history onto roles.
///
/// The system prompt leads. Command lines are skipped. Messages from the
/// sender become `user` turns and messages from the relay `assistant` turns;
/// a message from anyone else is a consistency error.
pub fn assemble(
    history: &[Message],
    sender: &str,
    service_identity: &str,
    system_prompt: &str,
) -> Result<Vec<ChatMessage>> {
    let mut turn = Vec::with_capacity(history.len() + 1);
    turn.push(ChatMessage::system(system_prompt));

    for stored in history {
        if is_command(&stored.body) {
            continue;
        }

        let entry = if stored.from_address == sender {
            ChatMessage::user(&stored.body)
        } else if stored.from_address == service_identity {
            ChatMessage::assistant(&stored.body)
        } else {
            error!(
                "Message {} in history of {} came from unexpected origin {}",
                stored.id, sender, stored.from_address
            );
            return Err(OrchestratorError::DataConsistency {
                sender: sender.to_string(),
                origin: stored.from_address.clone(),
                message_id: stored.id,
            });
        };
        turn.push(entry);
    }

    Ok(turn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::Role;

    fn stored(id: i64, from: &str, to: &str, body: &str) -> Message {
        Message {
            id,
            external_id: format!("SM{}", id),
            from_address: from.to_string(),
            to_address: to.to_string(),
            body: body.to_string(),
            created_at: "2024-01-01 00:00:00.000".to_string(),
        }
    }

    #[test]
    fn test_commands_are_skipped() {
        let history = vec![
            stored(1, "+1user", "+1relay", "hi"),
            stored(2, "+1relay", "+1user", "hello"),
            stored(3, "+1user", "+1relay", "#reset all"),
            stored(4, "+1user", "+1relay", "bye"),
        ];

        let turn = assemble(&history, "+1user", "+1relay", "Be brief.").unwrap();
        let roles: Vec<Role> = turn.iter().map(|m| m.role).collect();
        let contents: Vec<&str> = turn.iter().map(|m| m.content.as_str()).collect();

        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(contents, vec!["Be brief.", "hi", "hello", "bye"]);
    }

    #[test]
    fn test_empty_history_is_just_the_prompt() {
        let turn = assemble(&[], "+1user", "+1relay", "Be brief.").unwrap();
        assert_eq!(turn, vec![ChatMessage::system("Be brief.")]);
    }

    #[test]
    fn test_foreign_origin_is_rejected() {
        let history = vec![
            stored(1, "+1user", "+1relay", "hi"),
            stored(2, "+1stranger", "+1user", "psst"),
        ];

        let err = assemble(&history, "+1user", "+1relay", "Be brief.").unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::DataConsistency { message_id: 2, .. }
        ));
    }
}
