//! Application services - Use case implementations

mod message_service;

pub use message_service::MessageService;
