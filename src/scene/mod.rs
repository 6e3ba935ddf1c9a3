//! Authored AIGEN documents and the tables extracted from them.

pub(crate) mod component;
pub(crate) mod document;
