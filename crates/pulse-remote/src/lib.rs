pub mod client;
pub mod config;

pub use client::{RemoteRecordService, RemoteUnavailable};
pub use config::RemoteConfig;
