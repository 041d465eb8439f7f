use std::path::Path;

use narrato::domain::{
    ContentType, Document, JobProgress, JobStatus, OutputFormat, SessionId, UnknownJobStatus,
};

#[test]
fn given_pdf_filename_in_any_case_when_detecting_type_then_returns_pdf() {
    assert_eq!(ContentType::from_filename("Report.PDF"), Some(ContentType::Pdf));
    assert_eq!(ContentType::from_filename("notes.txt"), Some(ContentType::Text));
}

#[test]
fn given_unsupported_or_missing_extension_when_detecting_type_then_returns_none() {
    assert_eq!(ContentType::from_filename("slides.pptx"), None);
    assert_eq!(ContentType::from_filename("README"), None);
}

#[test]
fn given_mime_with_parameters_when_detecting_type_then_matches_text() {
    assert_eq!(
        ContentType::from_mime("text/plain; charset=utf-8"),
        Some(ContentType::Text)
    );
    assert_eq!(ContentType::from_mime("application/pdf"), Some(ContentType::Pdf));
    assert_eq!(ContentType::from_mime("image/png"), None);
}

#[test]
fn given_document_when_naming_output_then_prefixes_stem_and_uses_format_extension() {
    let document = Document::new("chapter one.pdf".to_string(), ContentType::Pdf, 10);
    assert_eq!(
        document.output_filename(OutputFormat::Pdf),
        "cleaned_chapter one.pdf"
    );
    assert_eq!(
        document.output_filename(OutputFormat::Text),
        "cleaned_chapter one.txt"
    );
}

#[test]
fn given_document_without_stem_when_naming_output_then_falls_back() {
    let document = Document::new(String::new(), ContentType::Text, 0);
    assert_eq!(
        document.output_filename(OutputFormat::Text),
        "cleaned_document.txt"
    );
}

#[test]
fn given_output_paths_when_detecting_format_then_maps_extension_to_media_type() {
    assert_eq!(
        OutputFormat::from_path(Path::new("out/cleaned_a.PDF")),
        Some(OutputFormat::Pdf)
    );
    assert_eq!(
        OutputFormat::from_path(Path::new("cleaned_a.txt")).map(|f| f.media_type()),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(OutputFormat::from_path(Path::new("cleaned_a.docx")), None);
    assert_eq!(OutputFormat::default(), OutputFormat::Pdf);
    assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
}

#[test]
fn given_status_string_in_any_case_when_parsing_then_round_trips_uppercase() {
    let status: JobStatus = " processing ".parse().unwrap();
    assert_eq!(status, JobStatus::Processing);
    assert_eq!(status.to_string(), "PROCESSING");
    assert_eq!(
        "paused".parse::<JobStatus>(),
        Err(UnknownJobStatus("paused".to_string()))
    );
}

#[test]
fn given_every_status_when_serializing_then_uses_uppercase_wire_name() {
    for status in JobStatus::ALL {
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::Value::String(status.as_str().to_string())
        );
    }
}

#[test]
fn given_progress_without_units_when_computing_percent_then_returns_zero() {
    assert_eq!(JobProgress::new(0).percent(), 0.0);
    assert_eq!(JobProgress::queued().percent(), 0.0);
}

#[test]
fn given_partial_progress_when_computing_percent_then_returns_ratio() {
    let mut progress = JobProgress::new(8);
    progress.completed = 2;
    assert_eq!(progress.percent(), 25.0);
    assert!(!progress.is_terminal());
}

#[test]
fn given_terminal_statuses_when_checking_then_only_completed_and_failed_are_terminal() {
    let mut progress = JobProgress::new(1);
    progress.status = JobStatus::Completed;
    assert!(progress.is_terminal());
    progress.status = JobStatus::Failed;
    assert!(progress.is_terminal());
    progress.status = JobStatus::Queued;
    assert!(!progress.is_terminal());
}

#[test]
fn given_session_id_when_formatting_and_parsing_then_yields_same_id() {
    let session = SessionId::new();
    let parsed: SessionId = session.to_string().parse().unwrap();
    assert_eq!(parsed, session);
    assert!("not-a-uuid".parse::<SessionId>().is_err());
}
