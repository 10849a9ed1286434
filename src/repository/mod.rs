//! Data access layer (Repository pattern)

pub mod logs;

pub use logs::{LogsRepository, LogsRepositoryImpl};
