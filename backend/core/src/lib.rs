pub mod analysis;
pub mod cnp;
pub mod error;
pub mod record;
pub mod traits;
pub mod types;

pub use analysis::{AnalysisModel, AnalyzeResult, AnalyzedDocument, DocumentField, DocumentPage, PageLine};
pub use cnp::{validate_cnp, CnpStatus};
pub use error::DocError;
pub use record::{DocumentRecord, NewDocumentRecord};
pub use traits::{DocumentAnalyzer, LlmProvider, LlmRequest, LlmResponse};
pub use types::{DocumentKind, ExtractedField, HandwrittenData, IdCardData, PreparedDocument};
