use crate::assets::image_fix::{ImageNormalizer, KeepPaths, RgbaPngNormalizer};
use crate::compile::blueprint::{Blueprint, assemble};
use crate::compile::components::compose_components;
use crate::compile::globals::resolve_globals;
use crate::effects::manifest::{EffectManifest, default_manifest_path};
use crate::foundation::diagnostics::Diagnostics;
use crate::foundation::error::AigenResult;
use crate::scene::component::ComponentTable;
use crate::scene::document::AigenDocument;
use std::path::{Path, PathBuf};

/// How image assets are treated while assembling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ImageFixMode {
    /// Keep authored paths.
    #[default]
    Disabled,
    /// Re-encode images as RGBA PNG files into `out_dir`.
    RgbaPng { out_dir: PathBuf },
}

/// Options for [`compile_file`].
#[derive(Clone, Debug, Default)]
pub struct CompileOpts {
    /// Effects manifest location. `None` looks beside the running executable.
    pub manifest_path: Option<PathBuf>,
    /// Fail instead of falling back to an empty manifest.
    pub strict_manifest: bool,
    /// Base directory for relative asset paths. `None` uses the input document's directory.
    pub assets_root: Option<PathBuf>,
    pub image_fix: ImageFixMode,
}

/// Result of compiling one document.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub blueprint: Blueprint,
    pub diagnostics: Diagnostics,
}

/// Run every stage over an in-memory document.
///
/// Stages run strictly in order: resolve globals, compose components, then assemble (which
/// translates effects). Nothing here fails; every recoverable problem lands in the returned
/// diagnostics.
#[tracing::instrument(skip_all)]
pub fn compile_document(
    mut doc: AigenDocument,
    manifest: &EffectManifest,
    images: &dyn ImageNormalizer,
) -> Compilation {
    let mut diagnostics = Diagnostics::new();

    resolve_globals(&mut doc, &mut diagnostics);

    let table = ComponentTable::from_document(&doc, &mut diagnostics);
    compose_components(&mut doc, &table, &mut diagnostics);

    let blueprint = assemble(doc, manifest, images, &mut diagnostics);

    Compilation {
        blueprint,
        diagnostics,
    }
}

/// Compile `input` (AIGEN text) into a blueprint JSON file at `output`.
///
/// Only an unreadable or unparsable input, an unwritable output, or (with
/// [`CompileOpts::strict_manifest`]) an unusable manifest are errors.
#[tracing::instrument(skip(opts), fields(input = %input.display(), output = %output.display()))]
pub fn compile_file(input: &Path, output: &Path, opts: &CompileOpts) -> AigenResult<Diagnostics> {
    let doc = AigenDocument::from_path(input)?;

    let mut manifest_diags = Diagnostics::new();
    let manifest_path = opts
        .manifest_path
        .clone()
        .unwrap_or_else(default_manifest_path);
    let manifest = if opts.strict_manifest {
        EffectManifest::load(&manifest_path, &mut manifest_diags)?
    } else {
        EffectManifest::load_or_empty(&manifest_path, &mut manifest_diags)
    };

    let assets_root = opts
        .assets_root
        .clone()
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let images: Box<dyn ImageNormalizer> = match &opts.image_fix {
        ImageFixMode::Disabled => Box::new(KeepPaths),
        ImageFixMode::RgbaPng { out_dir } => {
            Box::new(RgbaPngNormalizer::new(assets_root, out_dir.clone()))
        }
    };

    let Compilation {
        blueprint,
        diagnostics,
    } = compile_document(doc, &manifest, images.as_ref());
    blueprint.write_to(output)?;

    manifest_diags.extend(diagnostics);
    tracing::info!(
        warnings = manifest_diags.warnings().count(),
        notes = manifest_diags.notes().count(),
        "blueprint written"
    );
    Ok(manifest_diags)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
