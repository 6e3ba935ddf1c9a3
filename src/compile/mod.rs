//! The AIGEN compilation pipeline.
//!
//! Stages run in a fixed order and each consumes the document the previous one produced:
//!
//! 1. [`globals`]: substitute `$globals.*` tokens.
//! 2. [`components`]: expand `useComponents` through [`merge`].
//! 3. [`blueprint`]: copy assets and compositions, translating layer effects.

pub(crate) mod blueprint;
pub(crate) mod compiler;
pub(crate) mod components;
pub(crate) mod globals;
pub(crate) mod merge;
