#[path = "../helpers/mod.rs"]
mod helpers;

mod chunker_test;
mod output_registry_test;
mod progress_tracker_test;
mod transform_client_test;
