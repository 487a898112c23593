pub mod code_block;
pub mod providers;
pub mod refiner;

pub use code_block::strip_code_fences;
pub use refiner::{parse_fields, CompletionParams, ExtractedFields, TextRefiner};
