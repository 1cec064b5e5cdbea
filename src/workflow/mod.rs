pub mod cache;
pub mod decider;
pub mod resolver;
pub mod template;

pub use cache::*;
pub use decider::*;
pub use resolver::*;
pub use template::*;
