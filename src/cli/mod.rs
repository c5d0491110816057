pub mod orchestration;

pub use orchestration::{run_bump_workflow, BumpOutcome, BumpWorkflowArgs, WorkflowResult};
