//! Asset path rewriting applied while assembling a blueprint.

pub(crate) mod image_fix;
