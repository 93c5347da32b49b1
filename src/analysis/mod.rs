//! Message and time-of-day analysis

pub mod analyzer;
pub mod models;
pub mod time_context;

pub use analyzer::MessageAnalyzer;
pub use models::{MessageAnalysis, Sentiment, TimeContext, TimeOfDay, Topic};
pub use time_context::{Clock, FixedClock, SystemClock, TimeContextProvider};
