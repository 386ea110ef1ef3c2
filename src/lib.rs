pub mod catalog;
pub mod config;
pub mod error;
pub mod interpret;
pub mod records;
pub mod services;
pub mod session;
pub mod telemetry;
pub mod workflow;

pub use catalog::QuestionCatalog;
pub use config::AppConfig;
pub use session::SessionKey;
pub use workflow::WorkflowController;
