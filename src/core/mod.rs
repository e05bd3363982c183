pub mod config;
pub mod constants;
pub mod conversation;
pub mod message;
pub mod reveal;
pub mod sanitize;
pub mod session;
