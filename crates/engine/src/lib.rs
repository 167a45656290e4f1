//! Decision logic: employee matching, complexity estimation, recommendation
//! synthesis and backlog scheduling.

pub mod complexity;
pub mod matcher;
pub mod parser;
pub mod recommend;
pub mod repository;
pub mod scheduler;
pub mod synthesizer;
pub mod tradeoff;

pub use complexity::{ComplexityClient, ComplexityRequest, GeminiBackend, GenerativeBackend};
pub use matcher::Matcher;
pub use recommend::{RecommendationEngine, TaskQuery};
pub use repository::{InMemoryTaskRepository, TaskRepository};
pub use tradeoff::{TradeoffClient, TradeoffRequest};
