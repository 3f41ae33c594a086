pub mod handlers;
pub mod models;
mod service;

pub use service::{build_prompt, PrecautionsError, PrecautionsService, OFF_TOPIC_REPLY};
