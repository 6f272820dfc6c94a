pub mod extraction;
pub mod structuring;
pub mod rag;
pub mod processor; // End-to-end report analysis
