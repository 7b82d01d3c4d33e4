//! End-to-end generation runs against the real text-template filler and a
//! real destination directory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use formfill::candidate::{NamingRule, RowData};
use formfill::fill::{DocumentFiller, FillError, TextTemplateFiller};
use formfill::run::{ErrorPolicy, RunConfig, RunController, RunRequest, RunState};
use formfill::write::{DirectoryWriter, FsDirectoryWriter, WriteError};

fn rows(values: &[&str]) -> Vec<RowData> {
    values
        .iter()
        .map(|v| {
            let mut row = HashMap::new();
            row.insert("name".to_string(), v.to_string());
            row
        })
        .collect()
}

fn config() -> RunConfig {
    RunConfig {
        concurrency_generate: 2,
        concurrency_write: 2,
        error_policy: ErrorPolicy::Abort,
    }
}

/// Deterministic jitter bounded to 50ms, no rand dependency needed.
fn jitter_ms(seed: u64) -> u64 {
    let mut x = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x % 50
}

/// Delays each fill by a bounded pseudo-random amount, then delegates.
struct JitteredFiller {
    inner: TextTemplateFiller,
    calls: Mutex<u64>,
}

impl JitteredFiller {
    fn new() -> Self {
        Self {
            inner: TextTemplateFiller::new(),
            calls: Mutex::new(0),
        }
    }
}

impl DocumentFiller for JitteredFiller {
    async fn fill(&self, template: &[u8], row: &RowData) -> Result<Vec<u8>, FillError> {
        let seed = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        tokio::time::sleep(Duration::from_millis(jitter_ms(seed))).await;
        self.inner.fill(template, row).await
    }
}

/// Records delivery order before delegating to the real writer.
struct OrderTrackingWriter {
    inner: FsDirectoryWriter,
    delivered: Mutex<Vec<String>>,
    calls: Mutex<u64>,
}

impl OrderTrackingWriter {
    fn new(inner: FsDirectoryWriter) -> Self {
        Self {
            inner,
            delivered: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }
}

impl DirectoryWriter for OrderTrackingWriter {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), WriteError> {
        let seed = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            self.delivered.lock().unwrap().push(name.to_string());
            *calls
        };
        tokio::time::sleep(Duration::from_millis(jitter_ms(seed.wrapping_mul(31)))).await;
        self.inner.write(name, bytes).await
    }
}

#[tokio::test]
async fn three_row_run_writes_all_files_in_logical_order() {
    let dir = tempfile::tempdir().unwrap();
    let writer = Arc::new(OrderTrackingWriter::new(FsDirectoryWriter::new(dir.path())));
    let (controller, _events) =
        RunController::new(JitteredFiller::new(), Arc::clone(&writer), config());

    let template = b"hello {{name}}".to_vec();
    let stats = controller
        .generate(RunRequest::new(template, rows(&["a", "b", "c"])))
        .await
        .unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.generated_ok, 3);
    assert_eq!(stats.generated_err, 0);
    assert_eq!(stats.written_ok, 3);
    assert_eq!(stats.written_err, 0);
    assert_eq!(stats.skipped_gen, 0);
    assert_eq!(stats.skipped_write, 0);
    assert_eq!(controller.state(), RunState::Completed);

    // The logical sequence delivered to the write stage is exactly the
    // enumeration order, even though completions interleave.
    assert_eq!(
        *writer.delivered.lock().unwrap(),
        vec!["1.pdf", "2.pdf", "3.pdf"]
    );

    // And the files landed with the filled contents.
    for (name, contents) in [("1.pdf", "hello a"), ("2.pdf", "hello b"), ("3.pdf", "hello c")] {
        let written = std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(written, contents, "{name}");
    }
}

#[tokio::test]
async fn column_naming_drives_output_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, _events) = RunController::new(
        TextTemplateFiller::new(),
        FsDirectoryWriter::new(dir.path()),
        config(),
    );

    let mut request = RunRequest::new(b"{{name}}".to_vec(), rows(&["alice", "bob"]));
    request.naming = NamingRule::Column("name".to_string());
    controller.generate(request).await.unwrap();

    assert!(dir.path().join("alice.pdf").exists());
    assert!(dir.path().join("bob.pdf").exists());
}

#[tokio::test]
async fn skip_policy_survives_bad_rows_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, _events) = RunController::new(
        TextTemplateFiller::new(),
        FsDirectoryWriter::new(dir.path()),
        RunConfig {
            error_policy: ErrorPolicy::Skip,
            ..config()
        },
    );

    // Row "b" lacks the column the template references.
    let mut bad_rows = rows(&["a", "b", "c"]);
    bad_rows[1].remove("name");
    let stats = controller
        .generate(RunRequest::new(b"hi {{name}}".to_vec(), bad_rows))
        .await
        .unwrap();

    assert_eq!(stats.generated_ok, 2);
    assert_eq!(stats.generated_err, 1);
    assert_eq!(stats.skipped_gen, 1);
    assert_eq!(stats.written_ok, 2);
    assert!(dir.path().join("1.pdf").exists());
    assert!(!dir.path().join("2.pdf").exists());
    assert!(dir.path().join("3.pdf").exists());
}

#[tokio::test]
async fn abort_policy_surfaces_the_failure_and_stops() {
    let dir = tempfile::tempdir().unwrap();
    let (controller, _events) = RunController::new(
        TextTemplateFiller::new(),
        FsDirectoryWriter::new(dir.path()),
        config(),
    );

    let mut bad_rows = rows(&["a", "b", "c", "d", "e", "f"]);
    bad_rows[2].remove("name");
    let err = controller
        .generate(RunRequest::new(b"hi {{name}}".to_vec(), bad_rows))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("3.pdf"));
    assert_eq!(controller.state(), RunState::Aborted);
    // Files past the failure position never reach the destination.
    for name in ["4.pdf", "5.pdf", "6.pdf"] {
        assert!(!dir.path().join(name).exists(), "{name} should not exist");
    }
}

#[tokio::test]
async fn larger_run_preserves_contents_per_row() {
    let dir = tempfile::tempdir().unwrap();
    let writer = Arc::new(OrderTrackingWriter::new(FsDirectoryWriter::new(dir.path())));
    let (controller, _events) = RunController::new(
        JitteredFiller::new(),
        Arc::clone(&writer),
        RunConfig {
            concurrency_generate: 4,
            concurrency_write: 3,
            error_policy: ErrorPolicy::Abort,
        },
    );

    let values: Vec<String> = (0..25).map(|i| format!("row-{i}")).collect();
    let value_refs: Vec<&str> = values.iter().map(String::as_str).collect();
    let stats = controller
        .generate(RunRequest::new(b"{{name}}".to_vec(), rows(&value_refs)))
        .await
        .unwrap();

    assert_eq!(stats.written_ok, 25);

    let expected: Vec<String> = (1..=25).map(|i| format!("{i}.pdf")).collect();
    assert_eq!(*writer.delivered.lock().unwrap(), expected);

    for (i, value) in values.iter().enumerate() {
        let written = std::fs::read_to_string(dir.path().join(format!("{}.pdf", i + 1))).unwrap();
        assert_eq!(&written, value);
    }
}
