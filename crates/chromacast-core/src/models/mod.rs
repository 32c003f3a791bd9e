pub mod asset;
pub mod composition;
pub mod transformation;

pub use asset::*;
pub use composition::*;
pub use transformation::*;
