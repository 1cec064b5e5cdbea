pub mod evaluator;
pub mod expression;
pub mod flags;
pub mod parser;
pub mod value;

pub use evaluator::*;
pub use expression::*;
pub use flags::*;
pub use parser::*;
pub use value::*;
