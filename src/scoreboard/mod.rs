pub mod clock;
pub mod error;
pub mod service;
pub mod summary;

pub use error::ScoreboardError;
pub use service::ScoreboardService;
