mod clean;
mod download;
mod error_response;
mod health;
mod progress;

pub use clean::clean_handler;
pub use download::download_handler;
pub use error_response::{ErrorResponse, error_response};
pub use health::health_handler;
pub use progress::{ProgressResponse, progress_handler};
