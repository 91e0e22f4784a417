pub mod dispatch;
pub mod repair;
pub mod runner;

pub use dispatch::{DispatchLoop, DispatchResult, StopReason, ToolCallRecord};
pub use repair::{RepairOutcome, RepairPass};
pub use runner::{Agent, RunResult};
