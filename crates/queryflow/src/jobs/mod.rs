pub mod error;
pub mod model;
pub mod orchestrator;
pub mod poller;
pub mod rows;

pub use error::{QueryError, RemoteOperation};
pub use model::{ErrorDetail, EventRecord};
pub use orchestrator::{OrchestratorConfig, QueryOrchestrator};
pub use poller::{PollConfig, QueryPoller};
