//! Classification rules - Ordered table, first match wins

use crate::domain::entities::{Category, Field, MessageRecord, Notification, RoomId};

/// Checks one rule against a record and builds the payload when it applies
pub type Selector = for<'a> fn(&RoomId, &'a MessageRecord) -> Option<Notification<'a>>;

/// One row of the classification table
#[derive(Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub select: Selector,
}

/// Precedence is the row order. The room check must stay first so a message
/// from another room is never classified by its content.
pub const RULES: &[Rule] = &[
    Rule { category: Category::MismatchedRoom, select: mismatched_room },
    Rule { category: Category::TextMessage, select: text_message },
    Rule { category: Category::MemberJoined, select: member_joined },
    Rule { category: Category::MemberLeft, select: member_left },
    Rule { category: Category::StickerMessage, select: sticker_message },
    Rule { category: Category::PhotoMessage, select: photo_message },
    Rule { category: Category::DocumentMessage, select: document_message },
];

/// Run the table against a record. Falls back to `UnrecognizedMessage`.
pub fn classify<'a>(expected_room: &RoomId, record: &'a MessageRecord) -> Notification<'a> {
    RULES
        .iter()
        .find_map(|rule| (rule.select)(expected_room, record))
        .unwrap_or(Notification::UnrecognizedMessage { record })
}

fn mismatched_room<'a>(expected: &RoomId, record: &'a MessageRecord) -> Option<Notification<'a>> {
    (record.room.id != *expected).then_some(Notification::MismatchedRoom {
        room: &record.room,
        record,
    })
}

fn text_message<'a>(_: &RoomId, record: &'a MessageRecord) -> Option<Notification<'a>> {
    record.text().map(|text| Notification::TextMessage {
        sender: record.sender.as_ref(),
        text,
    })
}

fn member_joined<'a>(_: &RoomId, record: &'a MessageRecord) -> Option<Notification<'a>> {
    present(&record.joined_member).map(|member| Notification::MemberJoined { member })
}

fn member_left<'a>(_: &RoomId, record: &'a MessageRecord) -> Option<Notification<'a>> {
    present(&record.left_member).map(|member| Notification::MemberLeft { member })
}

fn sticker_message<'a>(_: &RoomId, record: &'a MessageRecord) -> Option<Notification<'a>> {
    present(&record.sticker).map(|sticker| Notification::StickerMessage {
        sender: record.sender.as_ref(),
        sticker,
    })
}

// An empty size list still counts as a photo.
fn photo_message<'a>(_: &RoomId, record: &'a MessageRecord) -> Option<Notification<'a>> {
    present(&record.photo).map(|photo| Notification::PhotoMessage {
        sender: record.sender.as_ref(),
        photo,
    })
}

fn document_message<'a>(_: &RoomId, record: &'a MessageRecord) -> Option<Notification<'a>> {
    present(&record.document).map(|document| Notification::DocumentMessage {
        sender: record.sender.as_ref(),
        document,
    })
}

fn present<T>(field: &Option<Field<T>>) -> Option<&Field<T>> {
    field.as_ref().filter(|f| f.is_present())
}
