#![no_std]

//! Brainmap Core - Brainordinate Mapping Definitions
//!
//! This crate provides the data model and collaborator traits for matrices
//! whose rows and columns are mapped to brainordinates (surface vertices and
//! volume voxels) or to named maps. It performs no I/O.

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod axis;
pub mod error;
pub mod header;
pub mod label;
pub mod palette;
pub mod traits;
pub mod types;

pub use axis::*;
pub use error::*;
pub use header::*;
pub use label::*;
pub use palette::*;
pub use traits::*;
pub use types::*;
