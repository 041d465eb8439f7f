use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{CleaningMessage, OutputRegistry, ProgressTracker};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<ProgressTracker>,
    pub outputs: Arc<OutputRegistry>,
    pub cleaning_sender: mpsc::Sender<CleaningMessage>,
    pub settings: Settings,
}
