use crate::foundation::diagnostics::{DiagnosticKind, Diagnostics, NodePath};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// File extensions (lowercase) that are routed through the image normalizer.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Whether an asset path names a raster image the engine may need re-encoded.
pub fn is_image_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| e.eq_ignore_ascii_case(known))
        })
}

/// Rewrites image asset paths before they are written into a blueprint.
///
/// Implementations must not fail: on any problem they report through `diags` and return
/// `source` unchanged.
pub trait ImageNormalizer {
    fn normalize(&self, source: &str, path: &NodePath, diags: &mut Diagnostics) -> String;
}

/// Leaves every asset path as authored.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepPaths;

impl ImageNormalizer for KeepPaths {
    fn normalize(&self, source: &str, _path: &NodePath, _diags: &mut Diagnostics) -> String {
        source.to_string()
    }
}

/// Re-encodes images as 8-bit RGBA PNG files in a dedicated output directory.
///
/// Relative sources are resolved against `assets_root` (normally the directory of the input
/// document). Output files are named `<stem>_fixed.png` and the rewritten path is absolute.
#[derive(Debug, Clone)]
pub struct RgbaPngNormalizer {
    pub assets_root: PathBuf,
    pub out_dir: PathBuf,
}

impl RgbaPngNormalizer {
    pub fn new(assets_root: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: assets_root.into(),
            out_dir: out_dir.into(),
        }
    }

    fn convert(&self, source: &str) -> anyhow::Result<PathBuf> {
        let src = Path::new(source);
        let full = if src.is_absolute() {
            src.to_path_buf()
        } else {
            self.assets_root.join(src)
        };

        let stem = full
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("image path '{}' has no file name", full.display()))?;

        let img = image::open(&full).with_context(|| format!("decode '{}'", full.display()))?;
        let rgba = img.to_rgba8();

        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("create output dir '{}'", self.out_dir.display()))?;
        let out = self.out_dir.join(format!("{stem}_fixed.png"));
        rgba.save_with_format(&out, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", out.display()))?;

        let out = std::path::absolute(&out)
            .with_context(|| format!("absolutize '{}'", out.display()))?;
        Ok(out)
    }
}

impl ImageNormalizer for RgbaPngNormalizer {
    fn normalize(&self, source: &str, path: &NodePath, diags: &mut Diagnostics) -> String {
        match self.convert(source) {
            Ok(out) => {
                tracing::info!(from = source, to = %out.display(), "normalized image asset");
                out.to_string_lossy().into_owned()
            }
            Err(e) => {
                diags.push(
                    DiagnosticKind::ImageNormalization,
                    path.clone(),
                    format!("could not normalize image '{source}': {e:#}; keeping original path"),
                );
                source.to_string()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image_fix.rs"]
mod tests;
