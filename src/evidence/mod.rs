//! Evidence module - validation and storage of invoice images

mod store;

pub use store::*;
