//! Compiler for PBRT v3 scene descriptions: parses a scene file (and its
//! includes and external assets) into an in-memory scene graph suitable for
//! rendering or export.

pub mod core;
pub mod materials;
pub mod pbrtparser;
pub mod shapes;
pub mod textures;

pub use crate::core::error::PbrtError;
pub use crate::core::scene::Scene;
pub use crate::pbrtparser::parser::parse_scene;
