//! Document processing orchestration: upload → analysis → refinement → record.

pub mod extraction;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod processor;

pub use extraction::{HandwrittenExtraction, IdCardExtraction};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockAnalyzer;
pub use processor::DocumentProcessor;
