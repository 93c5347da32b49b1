//! Chat service and its HTTP surface

pub mod handlers;
pub mod models;
pub mod random;
pub mod service;

pub use handlers::{build_router, ApiError, ChatRequest, ChatState};
pub use models::{backend_engine_tag, ChatResult, ChatStage, ToneMode, TEMPLATE_ENGINE};
pub use random::{EntropyRandom, RandomSource, SeededRandom};
pub use service::ChatService;
