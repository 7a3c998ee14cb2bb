mod identity;
mod message;
mod question;

pub use identity::{AdminSession, ChatIdentity};
pub use message::{Message, MessageIdGen};
pub use question::{QaEntry, Question};
