//! Pure formatting functions for UI output.
//!
//! Every user-facing line goes through here. Styling comes from `console`,
//! which drops colors automatically when the stream is not a terminal.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::BumpOutcome;
use crate::manifest::WriteInstruction;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the proposed version change (or initial version).
pub fn display_proposed_version(last_tag: Option<&str>, next_tag: &str) {
    match last_tag {
        Some(last) => {
            println!("\n{}", style("Proposed Release:").bold());
            println!("  From: {}", style(last).red());
            println!("  To:   {}", style(next_tag).green());
        }
        None => {
            println!("\n{}", style("Initial Release:").bold());
            println!("  New tag: {}", style(next_tag).green());
        }
    }
}

/// Display the manifests a release rewrites
pub fn display_write_plan(plan: &[WriteInstruction]) {
    println!("\n{}", style("Manifest updates:").bold());
    for write in plan {
        println!(
            "  - {} ({} = {})",
            write.path.display(),
            write.field_path,
            write.new_version
        );
    }
}

/// Display the rendered release notes
pub fn display_release_notes(notes: &str) {
    println!("\n{}", style("Release notes:").underlined());
    print!("{}", notes);
}

/// Summarize the outcome of a bump run.
pub fn display_outcome(outcome: &BumpOutcome) {
    match outcome {
        BumpOutcome::NoRelease => {
            display_status("No release-worthy changes since the last tag, nothing to do");
        }
        BumpOutcome::DryRun {
            release,
            notes,
            plan,
        } => {
            display_proposed_version(release.last_tag.as_deref(), &release.next_tag());
            display_write_plan(plan);
            display_release_notes(notes);
            display_status("Dry run, no files or git state were changed");
        }
        BumpOutcome::Released {
            release,
            notes,
            plan,
            pushed,
        } => {
            display_proposed_version(release.last_tag.as_deref(), &release.next_tag());
            display_write_plan(plan);
            display_release_notes(notes);
            if *pushed {
                display_success(&format!("Released and pushed {}", release.next_tag()));
            } else {
                display_success(&format!(
                    "Updated manifests to {}, git writes disabled",
                    release.next_version
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        // Visual verification test - output is printed to stdout
        display_success("test success");
    }

    #[test]
    fn test_display_outcome_no_release() {
        display_outcome(&BumpOutcome::NoRelease);
    }
}
