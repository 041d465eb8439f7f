mod chunker;
mod cleaning_pipeline;
mod cleaning_worker;
mod dispatcher;
mod output_registry;
mod progress_tracker;
mod transform_client;

pub use chunker::{PARAGRAPH_SEPARATOR, ParagraphChunker, chunk_text};
pub use cleaning_pipeline::{CleaningPipeline, PipelineError, PipelineOptions};
pub use cleaning_worker::{CleaningMessage, CleaningWorker, CleaningWorkerError};
pub use dispatcher::{Dispatcher, reassemble};
pub use output_registry::OutputRegistry;
pub use progress_tracker::{ProgressError, ProgressTracker};
pub use transform_client::{TransformClient, TransformError};
