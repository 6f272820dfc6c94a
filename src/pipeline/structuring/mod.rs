pub mod parser;
pub mod resolver;

pub use parser::*;
pub use resolver::*;
