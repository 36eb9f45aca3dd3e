//! End-to-end behaviour of the hash engine on real files

mod common;

use common::{EMPTY_DIGESTS, engine};
use filehash_core::error::{InternalError, IoErrorKind, ValidationError};
use filehash_core::{
    AlgorithmSelection, Error, HashAlgorithm, HashEngine, ProgressControl, StrategyHint,
};
use filehash_test_utils::{RecordingProvider, TestFileBuilder};

#[test]
fn test_abc_md5_and_sha256() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files.write_file("abc.txt", b"abc").unwrap();
    let selection: AlgorithmSelection = [HashAlgorithm::Md5, HashAlgorithm::Sha256].into();

    let hash = HashEngine::new().compute(&path, &selection).unwrap();

    assert_eq!(
        hash.hex(HashAlgorithm::Md5).unwrap(),
        "900150983cd24fb0d6963f7d28e17f72"
    );
    assert_eq!(
        hash.hex(HashAlgorithm::Sha256).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        hash.bytes(HashAlgorithm::Md5).unwrap().len(),
        16,
        "raw digest keeps its natural length"
    );
}

#[test]
fn test_empty_file_digests_every_algorithm() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files.write_file("empty.bin", b"").unwrap();
    let mut progress = RecordingProvider::new();

    let hash = HashEngine::new()
        .compute_with_progress(&path, &AlgorithmSelection::all(), &mut progress)
        .unwrap();

    for (algorithm, expected) in EMPTY_DIGESTS {
        assert_eq!(hash.hex(algorithm).unwrap(), expected, "{algorithm}");
    }
    assert_eq!(hash.bytes_processed(), 0);
    assert_eq!(hash.crc32(), Some(0));
    assert_eq!(hash.adler32(), Some(1));

    // Exactly the initial report
    assert_eq!(progress.calls(), 1);
    assert_eq!(progress.reports()[0].total_bytes, 0);
    assert_eq!(progress.reports()[0].processed_bytes, 0);
}

#[test]
fn test_hex_is_lowercase_and_twice_digest_length() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files
        .generate_deterministic_file("random.bin", 10_000, 1)
        .unwrap();

    let hash = HashEngine::new()
        .compute(&path, &AlgorithmSelection::all())
        .unwrap();

    for (algorithm, digest) in hash.iter() {
        assert_eq!(digest.hex().len(), digest.bytes().len() * 2, "{algorithm}");
        assert!(
            digest
                .hex()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "{algorithm}"
        );
        assert_eq!(hex::encode(digest.bytes()), digest.hex());
    }
}

#[test]
fn test_idempotent_across_runs() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files
        .generate_deterministic_file("data.bin", 300_000, 42)
        .unwrap();
    let engine = engine(64 * 1024, StrategyHint::Automatic);
    let selection = AlgorithmSelection::all();

    let first = engine.compute(&path, &selection).unwrap();
    let second = engine.compute(&path, &selection).unwrap();

    for algorithm in selection.iter() {
        assert_eq!(first.digest(algorithm).unwrap(), second.digest(algorithm).unwrap());
    }
}

#[test]
fn test_multi_algorithm_equals_single_runs() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files
        .generate_deterministic_file("data.bin", 200_000, 3)
        .unwrap();
    let engine = engine(32 * 1024, StrategyHint::Sequential);

    let combined = engine.compute(&path, &AlgorithmSelection::all()).unwrap();

    for algorithm in HashAlgorithm::ALL {
        let single = engine.compute(&path, &algorithm.into()).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(
            single.hex(algorithm).unwrap(),
            combined.hex(algorithm).unwrap(),
            "{algorithm}"
        );
    }
}

#[test]
fn test_snapshot_covers_exactly_the_selection() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files.write_file("abc.txt", b"abc").unwrap();
    let selection: AlgorithmSelection = [HashAlgorithm::Crc32, HashAlgorithm::Sha1].into();

    let hash = HashEngine::new().compute(&path, &selection).unwrap();

    assert_eq!(
        hash.algorithms().collect::<Vec<_>>(),
        vec![HashAlgorithm::Sha1, HashAlgorithm::Crc32]
    );
    assert_eq!(hash.crc32(), Some(0x352441c2));
    assert_eq!(hash.adler32(), None);
    assert!(matches!(
        hash.digest(HashAlgorithm::Md5),
        Err(Error::Internal(InternalError::NotComputed {
            algorithm: HashAlgorithm::Md5
        }))
    ));
}

#[test]
fn test_progress_is_monotonic_and_complete() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let size = 100_000;
    let path = files.generate_deterministic_file("data.bin", size, 9).unwrap();
    let mut progress = RecordingProvider::new();

    engine(4096, StrategyHint::Sequential)
        .compute_with_progress(&path, &AlgorithmSelection::all(), &mut progress)
        .unwrap();

    let reports = progress.reports();
    assert!(progress.is_monotonic());
    assert_eq!(reports[0].processed_bytes, 0);
    assert!(reports.iter().all(|r| r.total_bytes == size as u64));
    assert!(reports.iter().all(|r| r.processed_bytes <= r.total_bytes));
    assert_eq!(progress.last().unwrap().processed_bytes, size as u64);
    // Initial report plus one per chunk
    assert_eq!(reports.len(), 1 + size.div_ceil(4096));
}

#[test]
fn test_closure_callback() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files.generate_test_file("zeros.bin", 10_000).unwrap();
    let mut last = (0u64, 0u64);

    let hash = engine(1000, StrategyHint::Automatic).compute_with_progress(
        &path,
        &HashAlgorithm::Md5.into(),
        &mut |total: u64, processed: u64| {
            last = (total, processed);
            ProgressControl::Continue
        },
    );

    assert!(hash.is_some());
    assert_eq!(last, (10_000, 10_000));
}

#[test]
fn test_nonexistent_path() {
    let files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files.missing_path("ghost");
    let engine = HashEngine::new();

    assert!(engine.compute(&path, &HashAlgorithm::Md5.into()).is_none());

    let error = engine
        .try_compute(&path, &HashAlgorithm::Md5.into())
        .unwrap_err();
    assert!(error.is_file_not_accessible());
    match error {
        Error::Io(io_err) => {
            assert_eq!(io_err.kind, IoErrorKind::FileNotFound);
            assert_eq!(io_err.path.as_deref(), Some(path.as_path()));
        }
        other => panic!("Expected Io error, got {other:?}"),
    }
}

#[test]
fn test_directory_is_not_accessible() {
    let files = TestFileBuilder::in_temp_dir().unwrap();

    let error = HashEngine::new()
        .try_compute(files.base_dir(), &HashAlgorithm::Sha1.into())
        .unwrap_err();

    assert!(error.is_file_not_accessible());
}

#[test]
fn test_empty_selection() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files.write_file("abc.txt", b"abc").unwrap();
    let engine = HashEngine::new();

    assert!(engine.compute(&path, &AlgorithmSelection::new()).is_none());
    assert!(matches!(
        engine.try_compute(&path, &AlgorithmSelection::new()),
        Err(Error::Validation(ValidationError::EmptySelection))
    ));
}

#[test]
fn test_json_snapshot() {
    let mut files = TestFileBuilder::in_temp_dir().unwrap();
    let path = files.write_file("abc.txt", b"abc").unwrap();
    let selection: AlgorithmSelection = [HashAlgorithm::Md5, HashAlgorithm::Adler32].into();

    let hash = HashEngine::new().compute(&path, &selection).unwrap();
    let json = serde_json::to_value(&hash).unwrap();

    assert_eq!(json["hashes"]["md5"], "900150983cd24fb0d6963f7d28e17f72");
    assert_eq!(json["hashes"]["adler32"], "024d0127");
    assert_eq!(json["bytes_processed"], 3);
}
