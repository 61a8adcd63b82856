pub mod advisor;
pub mod error;
pub mod gemini;
pub mod parser;
pub mod prompts;
pub mod schema;
pub mod service;

pub mod test_support;

pub use advisor::ExportAdvisor;
pub use error::GenerationError;
pub use gemini::GeminiService;
pub use service::GenerationService;
