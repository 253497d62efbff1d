//! Stock observers

use crate::domain::entities::{Field, Notification, User};
use super::registry::ObserverResult;

const PREVIEW_CHARS: usize = 50;

fn who(user: Option<&Field<User>>) -> String {
    user.map(|u| u.to_string()).unwrap_or_else(|| "[unknown]".to_string())
}

/// One-line human readable summary of a notification
pub fn summarize(notification: &Notification<'_>) -> String {
    match notification {
        Notification::MismatchedRoom { room, .. } => {
            let title = room.title().unwrap_or("untitled");
            format!("message from unexpected room {} ({})", room.id, title)
        }
        Notification::TextMessage { sender, text } => {
            let preview: String = text.to_string().chars().take(PREVIEW_CHARS).collect();
            format!("{}: {}", who(*sender), preview)
        }
        Notification::MemberJoined { member } => format!("{} joined", member),
        Notification::MemberLeft { member } => format!("{} left", member),
        Notification::StickerMessage { sender, sticker } => {
            let label = match sticker {
                Field::Typed(s) => s.emoji.clone().unwrap_or_else(|| s.file_id.clone()),
                Field::Raw(raw) => raw.to_string(),
            };
            format!("{} sent sticker {}", who(*sender), label)
        }
        Notification::PhotoMessage { sender, photo } => match photo.typed() {
            Some(sizes) => format!("{} sent a photo ({} sizes)", who(*sender), sizes.len()),
            None => format!("{} sent a photo", who(*sender)),
        },
        Notification::DocumentMessage { sender, document } => {
            let name = match document {
                Field::Typed(d) => d.file_name.clone().unwrap_or_else(|| d.file_id.clone()),
                Field::Raw(raw) => raw.to_string(),
            };
            format!("{} sent document {}", who(*sender), name)
        }
        Notification::UnrecognizedMessage { record } => {
            let mut fields: Vec<&str> = record.extra.keys().map(String::as_str).collect();
            fields.sort_unstable();
            format!("unrecognized message with fields [{}]", fields.join(", "))
        }
    }
}

/// Logs every notification it receives at info level
pub fn log_notification(notification: &Notification<'_>) -> ObserverResult {
    tracing::info!("{} {}", notification.category(), summarize(notification));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Document, MessageRecord, Room, Sticker};
    use serde_json::json;

    #[test]
    fn test_summaries() {
        let alice: Field<User> = User::new(1).with_username("alice").into();
        let hi: Field<String> = "hi".to_string().into();
        let sticker: Field<Sticker> = Sticker { emoji: Some("👍".to_string()), ..Sticker::new("s1") }.into();
        let document: Field<Document> = Document::new("d1").with_file_name("report.pdf").into();

        assert_eq!(
            summarize(&Notification::TextMessage { sender: Some(&alice), text: &hi }),
            "@alice: hi"
        );
        assert_eq!(
            summarize(&Notification::StickerMessage { sender: None, sticker: &sticker }),
            "[unknown] sent sticker 👍"
        );
        assert_eq!(
            summarize(&Notification::DocumentMessage { sender: Some(&alice), document: &document }),
            "@alice sent document report.pdf"
        );
        assert_eq!(summarize(&Notification::MemberLeft { member: &alice }), "@alice left");
    }

    #[test]
    fn test_raw_payloads_are_summarized() {
        let bob = Field::<User>::Raw(json!("bob"));
        let count = Field::<String>::Raw(json!(5));
        let photo = Field::Raw(json!({"file_id": "x"}));
        let carol = Field::<User>::Raw(json!("carol"));

        assert_eq!(summarize(&Notification::TextMessage { sender: Some(&bob), text: &count }), "bob: 5");
        assert_eq!(summarize(&Notification::PhotoMessage { sender: Some(&bob), photo: &photo }), "bob sent a photo");
        assert_eq!(summarize(&Notification::MemberJoined { member: &carol }), "carol joined");
    }

    #[test]
    fn test_text_preview_is_truncated() {
        let long: Field<String> = "x".repeat(200).into();
        let summary = summarize(&Notification::TextMessage { sender: None, text: &long });
        assert_eq!(summary.len(), "[unknown]: ".len() + PREVIEW_CHARS);
    }

    #[test]
    fn test_mismatched_and_unrecognized() {
        let room = Room::new(99).with_title("Elsewhere");
        let record = MessageRecord::new(99);
        assert_eq!(
            summarize(&Notification::MismatchedRoom { room: &room, record: &record }),
            "message from unexpected room 99 (Elsewhere)"
        );

        let mut record = MessageRecord::new(42);
        record.extra.insert("poll".to_string(), json!({}));
        record.extra.insert("dice".to_string(), json!({}));
        assert_eq!(
            summarize(&Notification::UnrecognizedMessage { record: &record }),
            "unrecognized message with fields [dice, poll]"
        );
        assert!(log_notification(&Notification::UnrecognizedMessage { record: &record }).is_ok());
    }
}
