//! AIGEN is a YAML authoring format for motion-graphics scenes; this crate compiles it into the
//! JSON blueprint consumed by the downstream scene builder.
//!
//! Compilation is a fixed pipeline over a generic document tree:
//!
//! - Load an [`AigenDocument`]
//! - Substitute `$globals.*` tokens ([`resolve_globals`])
//! - Expand `useComponents` by deep-merging component properties ([`compose_components`])
//! - Assemble the [`Blueprint`], translating effects through an [`EffectManifest`]
//!
//! [`compile_file`] runs everything end to end; [`render_aigen`] goes the other way.
//! Recoverable problems never abort a compile: they are collected as [`Diagnostics`].
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod assets;
pub(crate) mod compile;
pub(crate) mod decompile;
pub(crate) mod effects;
pub(crate) mod scene;

pub use crate::foundation::diagnostics::{
    Diagnostic, DiagnosticKind, Diagnostics, NodePath, PathElem, Severity,
};
pub use crate::foundation::error::{AigenError, AigenResult};

pub use crate::assets::image_fix::{
    IMAGE_EXTENSIONS, ImageNormalizer, KeepPaths, RgbaPngNormalizer, is_image_path,
};
pub use crate::compile::blueprint::{Blueprint, assemble};
pub use crate::compile::compiler::{
    Compilation, CompileOpts, ImageFixMode, compile_document, compile_file,
};
pub use crate::compile::components::{compose_components, compose_layer};
pub use crate::compile::globals::{lookup_global, resolve_globals, resolve_value};
pub use crate::compile::merge::{deep_merge, merge_all};
pub use crate::decompile::printer::{decompile_file, render_aigen};
pub use crate::effects::manifest::{
    EffectManifest, EffectManifestEntry, MANIFEST_FILENAME, ManifestError, ManifestProperty,
    PropertyGroup, default_manifest_path,
};
pub use crate::effects::translate::{
    TranslatedEffect, TranslatedProperty, translate_effect, translate_effects,
};
pub use crate::scene::component::ComponentTable;
pub use crate::scene::document::AigenDocument;
