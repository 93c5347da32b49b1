//! Business dashboard chat engine
//!
//! Answers free-form business questions in a serious or joking tone. Replies
//! come from external text-generation backends when one answers in time, and
//! from a deterministic template composer otherwise. Every answer carries up
//! to four follow-up suggestions.

pub mod analysis;
pub mod backend;
pub mod chat;
pub mod composer;
pub mod config;
pub mod error;
pub mod metrics;
pub mod observability;
pub mod snapshot;
pub mod suggestions;

pub use chat::{ChatResult, ChatService, ToneMode};
pub use error::{ChatError, Result};
