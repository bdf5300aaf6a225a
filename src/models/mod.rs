pub mod repository;
pub mod board;
pub mod issue;

pub use repository::*;
pub use board::*;
pub use issue::*;
