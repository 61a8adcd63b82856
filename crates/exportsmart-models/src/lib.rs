pub mod agreements;
pub mod analysis;
pub mod config;
pub mod destinations;
pub mod export_request;
pub mod generation;
pub mod simulation;
pub mod storage_schema;

pub use agreements::{lookup_agreement, AgreementStatus, TradeAgreement};
pub use analysis::{AnalysisResult, CostItem, HistoricalDataPoint, ProductIdentification};
pub use config::{ControllerConfig, GenerationConfig, SimulatorConfig, StorageConfig};
pub use export_request::{Currency, ExportRequest, Incoterm, RequestError, TransportMode};
pub use generation::{GenerationRequest, IdentificationMode};
pub use simulation::SavedSimulation;
pub use storage_schema::StorageRow;
