use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use narrato::application::ports::{FileLoader, TextTransformer};
use narrato::application::services::{
    CleaningPipeline, CleaningWorker, OutputRegistry, ProgressTracker,
};
use narrato::infrastructure::llm::{MockTextTransformer, OpenAiTransformer};
use narrato::infrastructure::observability::{TracingConfig, init_tracing};
use narrato::infrastructure::rendering::renderer_for;
use narrato::infrastructure::text_processing::CompositeFileLoader;
use narrato::presentation::config::LlmSettings;
use narrato::presentation::{AppState, Environment, Settings, create_router};

const CLEANING_QUEUE_CAPACITY: usize = 64;

fn create_backend(settings: &LlmSettings) -> anyhow::Result<Arc<dyn TextTransformer>> {
    if settings.provider == "mock" {
        return Ok(Arc::new(MockTextTransformer::with_delay(
            Duration::from_millis(settings.mock_delay_ms),
        )));
    }
    Ok(Arc::new(OpenAiTransformer::from_settings(settings)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&TracingConfig::from_settings(
        environment,
        &settings.logging,
    ))?;

    tracing::info!(
        provider = %settings.llm.provider,
        model = %settings.llm.model,
        max_chunk_chars = settings.pipeline.max_chunk_chars,
        max_workers = settings.pipeline.max_workers,
        timeout_seconds = settings.pipeline.timeout_seconds,
        output_format = %settings.storage.output_format,
        "Configuration loaded"
    );

    let options = settings.pipeline.options();

    let tracker = Arc::new(ProgressTracker::new());
    let _reaper = tracker.spawn_reaper(settings.pipeline.reaper_interval());

    let outputs = Arc::new(OutputRegistry::new(
        settings.storage.output_dir.clone(),
        options.progress_retention,
    ));
    tokio::fs::create_dir_all(outputs.root()).await?;
    let _output_reaper = outputs.spawn_reaper(settings.pipeline.reaper_interval());

    let backend = create_backend(&settings.llm)?;
    let pipeline = Arc::new(CleaningPipeline::new(
        backend,
        Arc::clone(&tracker),
        options,
    ));

    let file_loader: Arc<dyn FileLoader> = Arc::new(CompositeFileLoader::with_default_adapters());
    let worker = Arc::new(CleaningWorker::new(
        file_loader,
        pipeline,
        renderer_for(settings.storage.output_format),
        Arc::clone(&outputs),
    ));

    let (cleaning_sender, cleaning_receiver) = mpsc::channel(CLEANING_QUEUE_CAPACITY);
    tokio::spawn(worker.run(cleaning_receiver));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;

    let state = AppState {
        tracker,
        outputs,
        cleaning_sender,
        settings,
    };

    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
