//! Couler Rust Library
//!
//! Fachada del workspace: re-exporta `couler_core` (templates, outputs y
//! resolver de referencias) para que clientes y `main.rs` usen un único crate.

pub use couler_core::*;
