pub mod analysis;
pub mod artifact;
pub mod error;
pub mod features;
pub mod filters;
pub mod frame;
pub mod stats;

pub use analysis::{
    AnalysisResult, Baseline, CognitiveAnalyzer, CognitiveState, NormalizedMetrics, StateScores,
};
pub use artifact::{ArtifactAttenuator, AttenuatorConfig};
pub use error::{ProcessingError, Result};
pub use features::{BandPowers, FeatureExtractor, FeatureSet, RatioFeatures};
pub use filters::{FilterBank, FilterConfig};
pub use frame::{CleanFrame, Frame};
