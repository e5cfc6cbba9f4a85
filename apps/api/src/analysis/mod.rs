// Analysis results: normalization of the service payload, the error
// taxonomy for failed attempts, and the display projection.

pub mod errors;
pub mod normalizer;
pub mod view;

pub use errors::{AnalysisError, Failure, FailureKind};
pub use normalizer::normalize;
pub use view::{build_view, ResultView, ScoreScale};
