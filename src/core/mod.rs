pub mod app;
pub mod attachment;
pub mod chat_stream;
pub mod config;
pub mod credentials;
pub mod message;
pub mod persona;
pub mod session;
pub mod submission;
pub mod transcript;
