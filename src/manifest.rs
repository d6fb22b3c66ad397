use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the add-in manifest, one level above the assets directory.
pub const MANIFEST_NAME: &str = "manifest.xml";

/// Remote icon URLs and the local paths that replace them.
pub const URL_REWRITES: [(&str, &str); 4] = [
    (
        "https://www.contoso.com/assets/icon-32.png",
        "./assets/icon-32.png",
    ),
    (
        "https://www.contoso.com/assets/hi-res-icon.png",
        "./assets/hi-res-icon.png",
    ),
    (
        "https://www.contoso.com/assets/icon-16.png",
        "./assets/icon-16.png",
    ),
    (
        "https://www.contoso.com/assets/icon-80.png",
        "./assets/icon-80.png",
    ),
];

/// Locate the manifest relative to the assets directory.
pub fn manifest_path(assets_dir: impl AsRef<Path>) -> PathBuf {
    assets_dir.as_ref().join("..").join(MANIFEST_NAME)
}

/// Replace every remote icon URL in the manifest with its local path and
/// overwrite the file in place.
///
/// The substitution is exact-match text replacement; all other content is
/// preserved byte for byte. A manifest without any of the known URLs is
/// rewritten unchanged.
pub fn patch(manifest: impl AsRef<Path>) -> Result<()> {
    let manifest = manifest.as_ref();

    if !manifest.exists() {
        bail!("Manifest not found at {}", manifest.display());
    }

    let mut content = fs::read_to_string(manifest)
        .with_context(|| format!("Failed to read {}", manifest.display()))?;

    for (url, local) in URL_REWRITES {
        content = content.replace(url, local);
    }

    fs::write(manifest, &content)
        .with_context(|| format!("Failed to write {}", manifest.display()))?;

    debug!(path = %manifest.display(), "Rewrote icon URLs");
    Ok(())
}
