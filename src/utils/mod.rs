//! Utility modules

pub mod id_generator;
pub mod mapping;
pub mod normalize;

pub use id_generator::*;
pub use mapping::*;
pub use normalize::*;
