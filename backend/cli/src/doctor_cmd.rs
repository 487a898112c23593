//! CLI Doctor Command

use ropsdoc_config::{redact_config, validate, AppConfig};

use crate::terminal_output::{note_error, note_success, note_warn};

/// Print the effective configuration (secrets masked) and the validation
/// report. Returns `false` when the configuration has errors.
pub fn run(config: &AppConfig) -> bool {
    println!("\n🔍 Running ROPSDoc Doctor...\n");

    println!("Effective configuration:");
    match serde_yaml::to_string(&redact_config(config)) {
        Ok(yaml) => println!("{yaml}"),
        Err(e) => note_warn(&format!("Could not render configuration: {e}")),
    }

    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }

    println!();
    if report.is_valid() {
        note_success("All checks passed! ROPSDoc is ready to serve.");
    } else {
        note_error("Some checks failed! Please fix the errors above.");
    }
    report.is_valid()
}
