pub mod definition;
pub mod record;
pub mod repository;

pub use definition::*;
pub use record::*;
pub use repository::*;
