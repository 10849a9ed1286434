//! Business logic layer

pub mod dispatcher;

pub use dispatcher::Dispatcher;
