pub mod analysis;
pub mod openai;

pub use analysis::{AnalysisError, AnalysisService};
pub use openai::{CompletionBackend, OpenAiClient, OpenAiClientError};
