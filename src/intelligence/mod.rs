pub mod detection;
pub mod messages;
pub mod narrative;
pub mod reference;
pub mod risk;

pub use detection::*;
pub use narrative::*;
pub use reference::*;
pub use risk::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferenceDataError {
    #[error("Reference data load failed ({0}): {1}")]
    Load(String, String),

    #[error("Reference data parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Reference data file {0} contains no entries")]
    Empty(String),
}
