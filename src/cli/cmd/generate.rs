use crate::manifest;
use crate::render::IconRenderer;
use console::style;
use std::process::ExitCode;
use tracing::{debug, error};

/// Render all icon sizes and then rewrite the manifest's icon URLs.
///
/// Rendering failures abort the run; the manifest rewrite is best effort
/// and never changes the exit code.
pub fn run(path: String) -> ExitCode {
    let renderer = match IconRenderer::load(&path) {
        Ok(renderer) => renderer,
        Err(err) => {
            error!(error = %err, "Cannot prepare icon renderer");
            return ExitCode::FAILURE;
        }
    };

    match renderer.render_all() {
        Ok(outputs) => {
            debug!(count = outputs.len(), "Rendered all icon sizes");
        }
        Err(err) => {
            error!(error = %err, "Icon generation failed");
            return ExitCode::FAILURE;
        }
    }

    // Best effort: a missing or unwritable manifest is reported but the
    // generated icons are still good
    match manifest::patch(manifest::manifest_path(&path)) {
        Ok(()) => println!(
            "{} Updated {} with local icon URLs",
            style("✓").green(),
            manifest::MANIFEST_NAME
        ),
        Err(err) => error!(error = %err, "Failed to update manifest"),
    }

    println!("{} All icons generated", style("✓").green());
    println!("For production, host the generated files on a CDN");

    ExitCode::SUCCESS
}
