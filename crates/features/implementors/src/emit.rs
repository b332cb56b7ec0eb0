use crate::error::{RegistryError, RegistryErrorExt};
use crate::render::{render_js, render_json};
use crate::url::implementors_file;
use dreg_domain::config::OutputFormat;
use dreg_domain::constants::{IMPLEMENTORS_DIR, JSON_FILE_NAME};
use dreg_domain::entry::TraitRef;
use dreg_domain::registry::Registry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the artifacts selected by `format` under `out_dir` and returns their paths.
///
/// The script lands at `implementors/<trait module path>/trait.<Name>.js`, the
/// JSON dump at `implementors.json`. Existing files are replaced.
///
/// # Errors
/// Returns [`RegistryError::Io`] if a directory or file cannot be written.
pub fn emit(
    registry: &Registry,
    trait_ref: &TraitRef,
    out_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>, RegistryError> {
    let mut written = Vec::new();

    if format.writes_js() {
        let path = out_dir.join(implementors_file(IMPLEMENTORS_DIR, &trait_ref.path));
        write_file(&path, &render_js(registry)?)?;
        written.push(path);
    }

    if format.writes_json() {
        let path = out_dir.join(JSON_FILE_NAME);
        write_file(&path, &render_json(registry)?)?;
        written.push(path);
    }

    for path in &written {
        info!(path = %path.display(), "Wrote artifact");
    }
    Ok(written)
}

fn write_file(path: &Path, content: &str) -> Result<(), RegistryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }
    fs::write(path, content).context(format!("Writing {}", path.display()))
}
