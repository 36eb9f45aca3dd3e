use filehash_cli::progress::RunOutcome;
use filehash_cli::progress::renderer::ProgressRenderer;
use filehash_cli::progress::{CliProgress, create_progress_infrastructure};
use filehash_core::{
    AlgorithmSelection, HashAlgorithm, HashConfig, HashEngine, ProgressControl, ProgressReport,
};
use std::fs;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempfile::NamedTempFile;

#[test]
fn test_engine_reports_reach_the_renderer() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), vec![7u8; 10_000]).unwrap();

    let engine = HashEngine::with_config(HashConfig::default().with_chunk_size(1_000)).unwrap();
    let selection = AlgorithmSelection::from(HashAlgorithm::Sha256);
    let (mut provider, rx) = create_progress_infrastructure(true, Arc::new(AtomicBool::new(false)));
    let mut rx = rx.unwrap();

    let result = engine.try_compute_with_progress(file.path(), &selection, &mut provider);
    assert!(result.is_ok());
    drop(provider);

    let mut renderer = ProgressRenderer::hidden("test".to_string());
    let mut received = Vec::new();
    while let Ok(report) = rx.try_recv() {
        renderer.handle_report(report);
        received.push(report);
    }

    // One initial report plus one per chunk, within channel capacity
    assert_eq!(received.len(), 11);
    assert_eq!(received[0], ProgressReport::new(10_000, 0));
    assert_eq!(
        renderer.last_report(),
        Some(ProgressReport::new(10_000, 10_000))
    );

    renderer.finish(RunOutcome::of(&result));
    assert_eq!(renderer.bar().unwrap().position(), 10_000);
    assert!(renderer.bar().unwrap().is_finished());
}

#[test]
fn test_outcome_completes_bar_when_final_report_is_dropped() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), vec![1u8; 5_000]).unwrap();

    let engine = HashEngine::with_config(HashConfig::default().with_chunk_size(1_000)).unwrap();
    let mut renderer = ProgressRenderer::hidden("test".to_string());
    let mut forwarded = 0;
    let result = engine.try_compute_with_progress(
        file.path(),
        &AlgorithmSelection::from(HashAlgorithm::Md5),
        &mut |total: u64, processed: u64| {
            // Only the first three reports make it through
            if forwarded < 3 {
                renderer.handle_report(ProgressReport::new(total, processed));
                forwarded += 1;
            }
            ProgressControl::Continue
        },
    );

    assert_eq!(
        renderer.last_report(),
        Some(ProgressReport::new(5_000, 2_000))
    );
    renderer.finish(RunOutcome::of(&result));

    let bar = renderer.bar().unwrap();
    assert!(bar.message().contains("Complete"));
    assert_eq!(bar.position(), 5_000);
}

#[test]
fn test_preset_cancel_flag_stops_before_reading() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), b"abc").unwrap();

    let mut provider = CliProgress::new(None, Arc::new(AtomicBool::new(true)));
    let error = HashEngine::new()
        .try_compute_with_progress(
            file.path(),
            &AlgorithmSelection::from(HashAlgorithm::Md5),
            &mut provider,
        )
        .unwrap_err();

    assert!(error.is_cancelled());
}
