//! The vibefun compiler driver.
//!
//! [`pipeline::compile`] orchestrates loading, resolution, and type
//! checking for a whole program; the binary in `main.rs` exposes the
//! diagnostic catalog (`explain`, `codes`). Parsing and code generation
//! are separate collaborators injected at the edges.

pub mod pipeline;
pub mod render;

pub use pipeline::{compile, CompileFailure, CompiledProgram};
pub use render::render_with_source;
