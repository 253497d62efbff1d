//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod category;
pub mod update;

pub use user::User;
pub use message::{Document, Field, MessageRecord, PhotoSize, Room, RoomId, Sticker};
pub use category::{Category, Notification};
pub use update::Update;
