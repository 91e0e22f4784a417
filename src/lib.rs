#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod agent;
pub mod audit;
pub mod compliance;
pub mod config;
pub mod error;
pub mod feedback;
pub mod oracle;
pub mod sandbox;
pub mod tools;

pub use agent::{Agent, RunResult};
pub use config::Config;
pub use error::YadaError;
