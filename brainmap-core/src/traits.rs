//! Collaborator traits
//!
//! The engine talks to three external collaborators: a matrix reader that
//! owns the data and header, a resolver for palettes and labels, and an
//! oracle for display selection state.

pub mod reader;
pub mod resolver;

pub use reader::*;
pub use resolver::*;
