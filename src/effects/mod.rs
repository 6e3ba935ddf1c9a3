//! Effect capability manifest and translation of authored effects into engine terms.

pub(crate) mod manifest;
pub(crate) mod translate;
