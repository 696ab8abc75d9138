//! Cryptography module - SHA-256 digests for block chaining

mod hash;

pub use hash::*;
