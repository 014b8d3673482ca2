pub mod api;
pub mod config;
pub mod error;
pub mod phrasing;
pub mod pose;
pub mod scorer;
pub mod skeleton;
pub mod validator;
// cmd and reports belong to the binary (see main.rs).

pub use api::{analyze, AnalysisRequest};
pub use error::{PfResult, PoseForgeError};
pub use pose::{Keypoint, PoseFrame, PoseSequence};
pub use scorer::{FeedbackItem, FeedbackKind, ScoreReport, Scorer};
