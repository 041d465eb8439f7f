mod mock_transformer;
mod openai_transformer;

pub use mock_transformer::MockTextTransformer;
pub use openai_transformer::{CLEANING_SYSTEM_PROMPT, OpenAiTransformer};
