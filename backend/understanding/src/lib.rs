//! Document understanding backed by Azure Form Recognizer.

pub mod form_recognizer;
pub mod id_document;
pub mod read;

pub use form_recognizer::{FormRecognizerClient, DEFAULT_API_VERSION};
pub use id_document::{digits_only, id_card_from_result};
pub use read::read_text_from_result;
