use super::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Opaque room identifier. Telegram uses signed integers, bridges sometimes
/// configure it as a string; the two forms never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RoomId {
    Int(i64),
    Str(String),
}

impl RoomId {
    /// Read an id typed by a human (config, env, CLI). Integers become
    /// `Int`, anything else is kept verbatim after trimming.
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        s.parse::<i64>()
            .map(RoomId::Int)
            .unwrap_or_else(|_| RoomId::Str(s.to_string()))
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomId::Int(id) => write!(f, "{}", id),
            RoomId::Str(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for RoomId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RoomId::from_text(s))
    }
}

impl From<i64> for RoomId {
    fn from(id: i64) -> Self {
        RoomId::Int(id)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        RoomId::Str(id.to_string())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        RoomId::Str(id)
    }
}

/// A content field as it arrived: decoded into `T` when it has the expected
/// shape, otherwise the raw JSON value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Field<T> {
    Typed(T),
    Raw(Value),
}

impl<T> Field<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            Field::Typed(value) => Some(value),
            Field::Raw(_) => None,
        }
    }

    /// Whether the field counts as set. Decoded values always do; raw values
    /// follow JSON truthiness (`false`, `0` and `""` do not).
    pub fn is_present(&self) -> bool {
        match self {
            Field::Typed(_) => true,
            Field::Raw(value) => truthy(value),
        }
    }
}

impl Field<String> {
    pub fn as_str(&self) -> Option<&str> {
        self.typed().map(String::as_str)
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Typed(value) => fmt::Display::fmt(value, f),
            Field::Raw(Value::String(s)) => f.write_str(s),
            Field::Raw(value) => write!(f, "{}", value),
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Typed(value)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The conversation a message was posted in. Only `id` is required; the
/// rest of the chat object is kept as received.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Room {
    pub id: RoomId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Room {
    pub fn new(id: impl Into<RoomId>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.extra.insert("title".to_string(), Value::String(title.into()));
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.extra.get("title").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Sticker {
    #[serde(default, alias = "id")]
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    #[serde(default)]
    pub is_animated: bool,
}

impl Sticker {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            emoji: None,
            set_name: None,
            is_animated: false,
        }
    }
}

/// One resolution of a photo; Telegram sends several per message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhotoSize {
    #[serde(default, alias = "id")]
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Document {
    #[serde(default, alias = "id")]
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl Document {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: None,
            mime_type: None,
            file_size: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// One inbound message as handed over by the transport.
///
/// Field names follow the Telegram Bot API on the wire (`chat`, `from`,
/// `new_chat_member`, `left_chat_member`); the Rust names describe what the
/// classifier looks at. Only `chat.id` must be well formed: content fields
/// that do not match their usual shape are kept raw, and wire fields the
/// classifier does not know about land in `extra`, so the record can always
/// be classified and forwarded whole.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MessageRecord {
    #[serde(rename = "chat", alias = "room")]
    pub room: Room,
    #[serde(rename = "from", alias = "sender", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Field<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Field<String>>,
    #[serde(rename = "new_chat_member", alias = "joined_member", default, skip_serializing_if = "Option::is_none")]
    pub joined_member: Option<Field<User>>,
    #[serde(rename = "left_chat_member", alias = "left_member", default, skip_serializing_if = "Option::is_none")]
    pub left_member: Option<Field<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<Field<Sticker>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Field<Vec<PhotoSize>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Field<Document>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageRecord {
    pub fn new(room_id: impl Into<RoomId>) -> Self {
        Self {
            room: Room::new(room_id),
            sender: None,
            text: None,
            joined_member: None,
            left_member: None,
            sticker: None,
            photo: None,
            document: None,
            extra: Map::new(),
        }
    }

    pub fn with_sender(mut self, user: User) -> Self {
        self.sender = Some(user.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(Field::Typed(text.into()));
        self
    }

    pub fn with_joined_member(mut self, user: User) -> Self {
        self.joined_member = Some(user.into());
        self
    }

    pub fn with_left_member(mut self, user: User) -> Self {
        self.left_member = Some(user.into());
        self
    }

    pub fn with_sticker(mut self, sticker: Sticker) -> Self {
        self.sticker = Some(sticker.into());
        self
    }

    pub fn with_photo(mut self, sizes: Vec<PhotoSize>) -> Self {
        self.photo = Some(sizes.into());
        self
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(document.into());
        self
    }

    /// Text body, if set. An empty string counts as no text.
    pub fn text(&self) -> Option<&Field<String>> {
        self.text.as_ref().filter(|text| match text {
            Field::Typed(s) => !s.is_empty(),
            raw => raw.is_present(),
        })
    }

    pub fn message_id(&self) -> Option<i64> {
        self.extra.get("message_id").and_then(Value::as_i64)
    }

    /// Send time as reported by the platform
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.extra
            .get("date")
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_room_id_from_text() {
        assert_eq!(RoomId::from_text("-100123"), RoomId::Int(-100123));
        assert_eq!(RoomId::from_text(" 42 "), RoomId::Int(42));
        assert_eq!(RoomId::from_text("ops-room"), RoomId::Str("ops-room".to_string()));
        assert_eq!("7".parse::<RoomId>(), Ok(RoomId::Int(7)));
    }

    #[test]
    fn test_room_id_forms_are_distinct() {
        assert_ne!(RoomId::from(42), RoomId::from("42"));
    }

    #[test]
    fn test_decode_telegram_message() {
        let record: MessageRecord = serde_json::from_value(json!({
            "message_id": 5,
            "date": 1_700_000_000,
            "chat": {"id": -100, "type": "supergroup", "title": "Ops"},
            "from": {"id": 1, "is_bot": false, "first_name": "Alice"},
            "text": "hello",
            "entities": []
        }))
        .unwrap();

        assert_eq!(record.room.id, RoomId::Int(-100));
        assert_eq!(record.room.title(), Some("Ops"));
        assert_eq!(record.text().and_then(Field::as_str), Some("hello"));
        assert_eq!(record.sender.as_ref().and_then(Field::typed).map(|u| u.id), Some(1));
        assert!(record.extra.contains_key("entities"));
        assert_eq!(record.message_id(), Some(5));
        assert_eq!(record.sent_at().map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_decode_accepts_domain_names() {
        let record: MessageRecord = serde_json::from_value(json!({
            "room": {"id": "general"},
            "sender": {"id": 3},
            "joined_member": {"id": 4, "first_name": "carol"}
        }))
        .unwrap();

        assert_eq!(record.room.id, RoomId::Str("general".to_string()));
        assert_eq!(record.joined_member.as_ref().and_then(Field::typed).map(|u| u.id), Some(4));
    }

    #[test]
    fn test_decode_requires_room() {
        assert!(serde_json::from_value::<MessageRecord>(json!({"text": "orphan"})).is_err());
        assert!(serde_json::from_value::<MessageRecord>(json!({"chat": {"title": "no id"}})).is_err());
    }

    #[test]
    fn test_odd_shapes_are_kept_raw() {
        let record: MessageRecord = serde_json::from_value(json!({
            "chat": {"id": 42, "title": 7},
            "from": "bob",
            "text": 5,
            "new_chat_member": "carol",
            "photo": {"file_id": "x"},
            "date": "yesterday"
        }))
        .unwrap();

        assert_eq!(record.sender, Some(Field::Raw(json!("bob"))));
        assert_eq!(record.text, Some(Field::Raw(json!(5))));
        assert_eq!(record.joined_member, Some(Field::Raw(json!("carol"))));
        assert_eq!(record.photo, Some(Field::Raw(json!({"file_id": "x"}))));
        assert_eq!(record.room.title(), None);
        assert_eq!(record.sent_at(), None);
    }

    #[test]
    fn test_raw_presence_follows_truthiness() {
        assert!(!Field::<User>::Raw(json!(false)).is_present());
        assert!(!Field::<User>::Raw(json!(0)).is_present());
        assert!(!Field::<User>::Raw(json!("")).is_present());
        assert!(Field::<User>::Raw(json!("carol")).is_present());
        assert!(Field::<User>::Raw(json!([])).is_present());
        assert!(Field::<User>::Raw(json!({})).is_present());
    }

    #[test]
    fn test_empty_text_is_absent() {
        assert!(MessageRecord::new(1).with_text("").text().is_none());

        let mut record = MessageRecord::new(1);
        record.text = Some(Field::Raw(json!(0)));
        assert!(record.text().is_none());
    }

    #[test]
    fn test_field_display() {
        let alice: Field<User> = User::new(1).with_username("alice").into();
        assert_eq!(alice.to_string(), "@alice");
        assert_eq!(Field::<User>::Raw(json!("bob")).to_string(), "bob");
        assert_eq!(Field::<User>::Raw(json!(12)).to_string(), "12");
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let raw = json!({
            "chat": {"id": 9, "type": "group"},
            "from": "bob",
            "poll": {"question": "lunch?"}
        });
        let record: MessageRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }
}
