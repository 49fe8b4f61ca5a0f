pub mod error;
pub use error::{CoreError, UpstreamError};
pub mod state;
pub use state::TaskStore;
pub mod lifecycle;
pub use lifecycle::{Lifecycle, Subscribe};
pub mod pipeline;
pub use pipeline::{CommentClassifier, CommentSource, Pipeline};
pub mod queue;
pub mod worker;
pub mod analyzer;
pub use analyzer::{AnalyzerApi, AnalyzerConfig};
