pub mod enums;
pub mod lab;
pub mod report;
pub mod risk;
pub mod summary;

pub use enums::*;
pub use lab::*;
pub use report::*;
pub use risk::*;
pub use summary::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Invalid reference range: {0}")]
    InvalidRange(String),
}
