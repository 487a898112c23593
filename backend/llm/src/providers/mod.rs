pub mod azure_openai;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use azure_openai::AzureOpenAiProvider;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockProvider;
