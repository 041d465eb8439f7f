mod document_renderer;
mod file_loader;
mod progress_sink;
mod text_transformer;

pub use document_renderer::{DocumentRenderer, RenderError};
pub use file_loader::{FileLoader, FileLoaderError};
pub use progress_sink::ProgressSink;
pub use text_transformer::{TextTransformer, TransformerError};
