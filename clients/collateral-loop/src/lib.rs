pub mod chain;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod instructions;
pub mod oracle;
pub mod roles;
pub mod state;
pub mod utils;
pub mod workflow;

pub use config::LoopConfig;
pub use errors::LoopError;
pub use roles::Operator;
pub use workflow::{run_workflow, show_account, wrap_only, LoopReport, Step, StepFailure};
