//! # Domain Module
//!
//! Logical contract keys and the bindings stored against them.

pub mod binding;
pub mod keys;

pub use binding::*;
pub use keys::*;
