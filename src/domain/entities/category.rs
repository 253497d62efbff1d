use super::{Document, Field, MessageRecord, PhotoSize, Room, Sticker, User};
use std::fmt;

/// Closed set of message classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    MismatchedRoom,
    TextMessage,
    MemberJoined,
    MemberLeft,
    StickerMessage,
    PhotoMessage,
    DocumentMessage,
    UnrecognizedMessage,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::MismatchedRoom,
        Category::TextMessage,
        Category::MemberJoined,
        Category::MemberLeft,
        Category::StickerMessage,
        Category::PhotoMessage,
        Category::DocumentMessage,
        Category::UnrecognizedMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MismatchedRoom => "MismatchedRoom",
            Category::TextMessage => "TextMessage",
            Category::MemberJoined => "MemberJoined",
            Category::MemberLeft => "MemberLeft",
            Category::StickerMessage => "StickerMessage",
            Category::PhotoMessage => "PhotoMessage",
            Category::DocumentMessage => "DocumentMessage",
            Category::UnrecognizedMessage => "UnrecognizedMessage",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raised notification: the category plus its payload, borrowed from the
/// record that produced it. Content fields are passed on as received, decoded
/// or raw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification<'a> {
    MismatchedRoom {
        room: &'a Room,
        record: &'a MessageRecord,
    },
    TextMessage {
        sender: Option<&'a Field<User>>,
        text: &'a Field<String>,
    },
    MemberJoined {
        member: &'a Field<User>,
    },
    MemberLeft {
        member: &'a Field<User>,
    },
    StickerMessage {
        sender: Option<&'a Field<User>>,
        sticker: &'a Field<Sticker>,
    },
    PhotoMessage {
        sender: Option<&'a Field<User>>,
        photo: &'a Field<Vec<PhotoSize>>,
    },
    DocumentMessage {
        sender: Option<&'a Field<User>>,
        document: &'a Field<Document>,
    },
    UnrecognizedMessage {
        record: &'a MessageRecord,
    },
}

impl Notification<'_> {
    pub fn category(&self) -> Category {
        match self {
            Notification::MismatchedRoom { .. } => Category::MismatchedRoom,
            Notification::TextMessage { .. } => Category::TextMessage,
            Notification::MemberJoined { .. } => Category::MemberJoined,
            Notification::MemberLeft { .. } => Category::MemberLeft,
            Notification::StickerMessage { .. } => Category::StickerMessage,
            Notification::PhotoMessage { .. } => Category::PhotoMessage,
            Notification::DocumentMessage { .. } => Category::DocumentMessage,
            Notification::UnrecognizedMessage { .. } => Category::UnrecognizedMessage,
        }
    }
}
