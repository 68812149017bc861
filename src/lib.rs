//! Gem Cascade (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, the
//! integration tests and the benches share a single import path.

pub use gem_cascade_core as core;
pub use gem_cascade_input as input;
pub use gem_cascade_term as term;
pub use gem_cascade_types as types;
