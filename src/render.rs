use anyhow::{Context, Result, anyhow, bail};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Pixel sizes required by the add-in manifest.
pub const ICON_SIZES: [u32; 3] = [16, 32, 80];

/// Size of the high-DPI variant.
pub const HI_RES_SIZE: u32 = 160;

/// File name of the vector source inside the assets directory.
pub const SOURCE_NAME: &str = "icon.svg";

/// Rasterizes the vector icon source at the fixed sizes the manifest
/// references.
///
/// The source is parsed once up front; each output is rendered from the
/// same tree with a uniform scale transform.
pub struct IconRenderer {
    assets_dir: PathBuf,
    tree: usvg::Tree,
}

impl IconRenderer {
    /// Load the vector source from the given assets directory and prepare
    /// the rendering engine.
    pub fn load(assets_dir: impl AsRef<Path>) -> Result<Self> {
        let assets_dir = assets_dir.as_ref().to_path_buf();
        let source = assets_dir.join(SOURCE_NAME);

        if !source.exists() {
            bail!("Source file not found: {}", source.display());
        }

        let mut opt = usvg::Options::default();
        opt.resources_dir = Some(assets_dir.clone());
        opt.fontdb_mut().load_system_fonts();
        if opt.fontdb.is_empty() {
            // Only matters for SVG text elements, which icons rarely carry
            warn!("No system fonts found; text elements will not render");
        } else {
            debug!(fonts = opt.fontdb.len(), "Loaded system fonts");
        }

        let svg_data =
            fs::read(&source).with_context(|| format!("Failed to read {}", source.display()))?;
        let tree = usvg::Tree::from_data(&svg_data, &opt)
            .with_context(|| format!("Failed to parse {}", source.display()))?;

        Ok(Self { assets_dir, tree })
    }

    /// Output path for the given size. The high-DPI variant has its own
    /// name; every other size follows the `icon-<size>.png` convention.
    pub fn output_path(&self, size: u32) -> PathBuf {
        if size == HI_RES_SIZE {
            self.assets_dir.join("hi-res-icon.png")
        } else {
            self.assets_dir.join(format!("icon-{size}.png"))
        }
    }

    fn rasterize(&self, size: u32, output: &Path) -> Result<()> {
        let mut pixmap = tiny_skia::Pixmap::new(size, size)
            .ok_or_else(|| anyhow!("Failed to allocate {size}x{size} pixmap"))?;

        let scale_x = size as f32 / self.tree.size().width();
        let scale_y = size as f32 / self.tree.size().height();
        resvg::render(
            &self.tree,
            tiny_skia::Transform::from_scale(scale_x, scale_y),
            &mut pixmap.as_mut(),
        );

        pixmap
            .save_png(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        debug!(size = size, path = %output.display(), "Rasterized icon");
        Ok(())
    }

    /// Render every required size in order, overwriting existing outputs.
    /// Stops at the first failure; sizes already rendered are left on disk.
    pub fn render_all(&self) -> Result<Vec<PathBuf>> {
        let mut outputs = Vec::new();

        for size in ICON_SIZES {
            let output = self.output_path(size);
            self.rasterize(size, &output)
                .with_context(|| format!("Failed to generate {size}x{size} icon"))?;
            println!(
                "{} Generated {} ({}x{})",
                style("✓").green(),
                output.display(),
                size,
                size
            );
            outputs.push(output);
        }

        let output = self.output_path(HI_RES_SIZE);
        self.rasterize(HI_RES_SIZE, &output)
            .with_context(|| format!("Failed to generate {HI_RES_SIZE}x{HI_RES_SIZE} icon"))?;
        println!(
            "{} Generated {} ({}x{})",
            style("✓").green(),
            output.display(),
            HI_RES_SIZE,
            HI_RES_SIZE
        );
        outputs.push(output);

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="400" viewBox="0 0 400 400"><rect width="400" height="400" fill="#2b579a"/><circle cx="200" cy="200" r="140" fill="#ffffff"/></svg>"##;

    fn write_source(dir: &Path) {
        fs::write(dir.join(SOURCE_NAME), TEST_SVG).unwrap();
    }

    fn png_dimensions(path: &Path) -> (u32, u32) {
        let decoder = png::Decoder::new(fs::File::open(path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        (info.width, info.height)
    }

    #[test_log::test]
    fn test_render_fixed_sizes() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        write_source(tmp.path());

        let renderer = IconRenderer::load(tmp.path())?;
        let outputs = renderer.render_all()?;
        assert_eq!(outputs.len(), ICON_SIZES.len() + 1);

        for size in ICON_SIZES {
            let path = tmp.path().join(format!("icon-{size}.png"));
            assert_eq!(png_dimensions(&path), (size, size));
        }
        Ok(())
    }

    #[test]
    fn test_render_hi_res() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        write_source(tmp.path());

        IconRenderer::load(tmp.path())?.render_all()?;

        let path = tmp.path().join("hi-res-icon.png");
        assert_eq!(png_dimensions(&path), (HI_RES_SIZE, HI_RES_SIZE));
        Ok(())
    }

    #[test]
    fn test_missing_source() {
        let tmp = tempfile::tempdir().unwrap();

        assert!(IconRenderer::load(tmp.path()).is_err());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_source() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(SOURCE_NAME), "not an svg").unwrap();

        assert!(IconRenderer::load(tmp.path()).is_err());
    }

    #[test]
    fn test_rerun_overwrites() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        write_source(tmp.path());

        let renderer = IconRenderer::load(tmp.path())?;
        renderer.render_all()?;
        let first = fs::read(tmp.path().join("icon-32.png"))?;

        renderer.render_all()?;
        let second = fs::read(tmp.path().join("icon-32.png"))?;

        assert_eq!(first, second);
        Ok(())
    }
}
