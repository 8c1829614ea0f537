mod error;
mod intervals;
mod tree;
mod types;

pub use error::ModelError;
pub use intervals::*;
pub use tree::{ChildIndex, ProfileCollection};
pub use types::*;
