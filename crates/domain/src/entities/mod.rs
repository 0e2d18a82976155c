//! Domain entities - Objects with identity and lifecycle

mod message;

pub use message::Message;
