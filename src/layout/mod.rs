pub mod compose;
pub mod tree;

pub use compose::*;
pub use tree::*;
