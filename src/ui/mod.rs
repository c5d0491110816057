//! User interface module.
//!
//! The tool runs unattended in CI, so there are no prompts; `formatter`
//! holds all output.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_outcome, display_proposed_version,
    display_release_notes, display_status, display_success, display_write_plan,
};
