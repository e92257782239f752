//! Core types for clipwave.

pub mod asset;
pub mod format;
pub mod upload;

pub use asset::*;
pub use format::*;
pub use upload::*;
