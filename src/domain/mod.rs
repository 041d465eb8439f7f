mod chunk;
mod document;
mod job_progress;
mod job_status;
mod output_format;
mod session_id;

pub use chunk::{Chunk, TransformResult};
pub use document::{ContentType, Document};
pub use job_progress::JobProgress;
pub use job_status::{JobStatus, UnknownJobStatus};
pub use output_format::OutputFormat;
pub use session_id::SessionId;
