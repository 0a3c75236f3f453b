pub mod config;
pub mod error;
pub mod language;
pub mod poeditor;
pub mod publisher;
pub mod pull_request;
pub mod store;
