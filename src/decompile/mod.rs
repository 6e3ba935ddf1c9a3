//! Blueprint to AIGEN rendering, the inverse direction of the compiler.

pub(crate) mod printer;
