//! Value Objects - Immutable, identity-less domain primitives

mod message_id;
mod message_status;

pub use message_id::MessageId;
pub use message_status::MessageStatus;
