//! Integration tests for the answering worker.
//!
//! These tests drive the full capture -> recognize -> match -> click
//! loop with scripted collaborators, so they run anywhere without a
//! display server or an OCR engine.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use image::RgbaImage;

use autoquiz::bank::{AnswerLabel, QaRecord};
use autoquiz::desktop::capture::{CaptureRegion, ScreenGrabber};
use autoquiz::desktop::dispatch::AnswerDispatcher;
use autoquiz::desktop::input::PointerDevice;
use autoquiz::desktop::window::{WindowBounds, WindowTracker};
use autoquiz::matching::FuzzyMatcher;
use autoquiz::ocr::TextRecognizer;
use autoquiz::worker::{MissLog, Worker, WorkerConfig, WorkerEvent, WorkerState, STOP_TIMEOUT};

/// Returns one scripted frame per call, then blank frames forever.
struct ScriptedRecognizer {
    frames: VecDeque<Vec<String>>,
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&mut self, _image: &RgbaImage) -> anyhow::Result<Vec<String>> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}

/// Counts grabs and optionally fails the first few of them.
struct ScriptedGrabber {
    fail_first: usize,
    grabs: Arc<AtomicUsize>,
}

impl ScreenGrabber for ScriptedGrabber {
    fn grab(&mut self, _region: Option<CaptureRegion>) -> anyhow::Result<RgbaImage> {
        let n = self.grabs.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first {
            anyhow::bail!("monitor unplugged");
        }
        Ok(RgbaImage::new(1, 1))
    }
}

struct RecordingPointer {
    clicks: Arc<Mutex<Vec<(i32, i32)>>>,
}

impl PointerDevice for RecordingPointer {
    fn click(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
        self.clicks.lock().unwrap().push((x, y));
        Ok(())
    }
}

struct FixedTracker {
    bounds: Option<WindowBounds>,
}

impl WindowTracker for FixedTracker {
    fn bounds(&mut self) -> Option<WindowBounds> {
        self.bounds
    }
}

struct Harness {
    worker: Worker,
    events: Receiver<WorkerEvent>,
    clicks: Arc<Mutex<Vec<(i32, i32)>>>,
    grabs: Arc<AtomicUsize>,
    miss_path: PathBuf,
    _dir: tempfile::TempDir,
}

fn sample_bank() -> Vec<QaRecord> {
    vec![
        QaRecord {
            question: "地球是圆的吗".to_string(),
            answer: AnswerLabel::A,
            options: Some(["是".to_string(), "否".to_string()]),
        },
        QaRecord {
            question: "太阳从西边升起吗".to_string(),
            answer: AnswerLabel::B,
            options: None,
        },
    ]
}

fn frame(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Worker wired to scripted collaborators, reference-sized window at the
/// screen origin.
fn build_worker(
    frames: Vec<Vec<String>>,
    fail_first_grabs: usize,
    tracker_bounds: Option<WindowBounds>,
    config: WorkerConfig,
) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let miss_path = dir.path().join("unmatched.log");
    let clicks = Arc::new(Mutex::new(Vec::new()));
    let grabs = Arc::new(AtomicUsize::new(0));

    let (worker, events) = Worker::new(
        Arc::new(sample_bank()),
        FuzzyMatcher::new(),
        Box::new(ScriptedGrabber {
            fail_first: fail_first_grabs,
            grabs: grabs.clone(),
        }),
        Box::new(ScriptedRecognizer {
            frames: frames.into(),
        }),
        AnswerDispatcher::new(
            Box::new(RecordingPointer {
                clicks: clicks.clone(),
            }),
            Box::new(FixedTracker {
                bounds: tracker_bounds,
            }),
        ),
        MissLog::new(&miss_path),
        config,
    );

    Harness {
        worker,
        events,
        clicks,
        grabs,
        miss_path,
        _dir: dir,
    }
}

fn fast_config() -> WorkerConfig {
    WorkerConfig {
        capture_region: None,
        poll_interval: Duration::from_millis(10),
        min_interval: Duration::ZERO,
    }
}

fn reference_window() -> Option<WindowBounds> {
    Some(WindowBounds::new(0, 0, 527, 970))
}

fn next_event(events: &Receiver<WorkerEvent>) -> WorkerEvent {
    events
        .recv_timeout(Duration::from_secs(2))
        .expect("expected an event before the timeout")
}

/// Skip past status updates until the next completed iteration.
fn next_result(events: &Receiver<WorkerEvent>) -> (String, Option<QaRecord>, bool) {
    loop {
        if let WorkerEvent::Result {
            query,
            record,
            from_cache,
            ..
        } = next_event(events)
        {
            return (query, record, from_cache);
        }
    }
}

// ============================================================================
// Test 1: Recognized Question Gets Matched and Clicked
// ============================================================================

#[test]
fn test_question_is_matched_and_clicked() {
    let mut h = build_worker(
        vec![frame(&["地球是圆的吗"])],
        0,
        reference_window(),
        fast_config(),
    );
    h.worker.start();

    let first = next_event(&h.events);
    assert!(
        matches!(
            first,
            WorkerEvent::Status {
                state: WorkerState::Running,
                ..
            }
        ),
        "First event should announce the running state, got {:?}",
        first
    );

    let (query, record, from_cache) = next_result(&h.events);
    assert_eq!(query, "地球是圆的吗");
    assert_eq!(
        record.map(|r| r.answer),
        Some(AnswerLabel::A),
        "Exact bank question should match its record"
    );
    assert!(!from_cache, "First occurrence should not come from cache");

    assert!(h.worker.stop());
    assert_eq!(
        h.clicks.lock().unwrap().as_slice(),
        &[(130, 785)],
        "Answer A in a reference-sized window should land on its anchor"
    );
}

// ============================================================================
// Test 2: Same Text Across Ticks Is Handled Once
// ============================================================================

#[test]
fn test_repeated_text_is_handled_once() {
    let q = frame(&["地球是圆的吗"]);
    let mut h = build_worker(
        vec![q.clone(), q.clone(), q],
        0,
        reference_window(),
        fast_config(),
    );
    h.worker.start();
    thread::sleep(Duration::from_millis(300));
    assert!(h.worker.stop());

    let results = h
        .events
        .try_iter()
        .filter(|e| matches!(e, WorkerEvent::Result { .. }))
        .count();
    assert_eq!(
        results, 1,
        "A question sitting on screen across ticks should produce one result"
    );
    assert_eq!(
        h.clicks.lock().unwrap().len(),
        1,
        "A question sitting on screen across ticks should produce one click"
    );
}

// ============================================================================
// Test 3: Cache Serves a Question Seen Again
// ============================================================================

#[test]
fn test_cache_serves_repeat_question() {
    let mut h = build_worker(
        vec![
            frame(&["地球是圆的吗"]),
            frame(&["完全陌生的问题内容"]),
            frame(&["地球是圆的吗"]),
        ],
        0,
        reference_window(),
        fast_config(),
    );
    h.worker.start();

    let (_, first, first_cached) = next_result(&h.events);
    assert!(first.is_some(), "First sighting should hit the bank");
    assert!(!first_cached);

    let (_, miss, _) = next_result(&h.events);
    assert!(miss.is_none(), "Unrelated text should not match anything");

    let (query, second, second_cached) = next_result(&h.events);
    assert_eq!(query, "地球是圆的吗");
    assert!(second.is_some());
    assert!(
        second_cached,
        "Second sighting of the same question should come from cache"
    );

    assert!(h.worker.stop());
    assert_eq!(
        h.clicks.lock().unwrap().len(),
        2,
        "Both sightings should click, cached or not"
    );
}

// ============================================================================
// Test 4: Unmatched Question Lands in the Miss Log
// ============================================================================

#[test]
fn test_unmatched_question_is_logged() {
    let mut h = build_worker(
        vec![frame(&["世界上最高的山是什么"])],
        0,
        reference_window(),
        fast_config(),
    );
    h.worker.start();

    let (query, record, _) = next_result(&h.events);
    assert_eq!(query, "世界上最高的山是什么");
    assert!(record.is_none(), "Question far from the bank should not match");

    assert!(h.worker.stop());
    assert!(
        h.clicks.lock().unwrap().is_empty(),
        "No match means no click"
    );

    let logged = std::fs::read_to_string(&h.miss_path).expect("miss log should exist");
    assert!(
        logged.contains("世界上最高的山是什么"),
        "Miss log should record the unmatched question, got {:?}",
        logged
    );
}

// ============================================================================
// Test 5: Stop Is Prompt Even Under Huge Intervals
// ============================================================================

#[test]
fn test_stop_is_prompt_under_huge_intervals() {
    let mut h = build_worker(
        vec![frame(&["地球是圆的吗"])],
        0,
        reference_window(),
        WorkerConfig {
            capture_region: None,
            poll_interval: Duration::from_secs(3600),
            min_interval: Duration::from_secs(3600),
        },
    );
    h.worker.start();
    thread::sleep(Duration::from_millis(150));
    assert_eq!(
        h.grabs.load(Ordering::SeqCst),
        1,
        "Only the first tick should have captured"
    );

    let begin = Instant::now();
    assert!(h.worker.stop(), "Stop should succeed despite the intervals");
    assert!(
        begin.elapsed() < STOP_TIMEOUT,
        "Stop should not wait out the configured intervals, took {:?}",
        begin.elapsed()
    );

    thread::sleep(Duration::from_millis(100));
    assert_eq!(
        h.grabs.load(Ordering::SeqCst),
        1,
        "No captures may happen after stop returns"
    );
    assert_eq!(h.worker.state(), WorkerState::Idle);
}

// ============================================================================
// Test 6: Capture Failure Becomes an Error Event, Loop Continues
// ============================================================================

#[test]
fn test_capture_failure_does_not_kill_the_loop() {
    let mut h = build_worker(
        vec![frame(&["地球是圆的吗"])],
        1,
        reference_window(),
        fast_config(),
    );
    h.worker.start();

    // Status(Running), then the failed tick, then the recovered one
    let _ = next_event(&h.events);
    let error = next_event(&h.events);
    match error {
        WorkerEvent::Error { message, .. } => {
            assert!(
                message.contains("Screen capture failed"),
                "Error event should carry the capture failure, got {:?}",
                message
            );
        }
        other => panic!("Expected an error event, got {:?}", other),
    }

    let (query, record, _) = next_result(&h.events);
    assert_eq!(query, "地球是圆的吗", "Loop should keep going after a failure");
    assert!(record.is_some());

    assert!(h.worker.stop());
}

// ============================================================================
// Test 7: Noise Token Is Stripped Before Matching
// ============================================================================

#[test]
fn test_noise_token_is_stripped() {
    let mut h = build_worker(
        vec![frame(&["咸鱼游戏", "地球是圆的吗"])],
        0,
        reference_window(),
        fast_config(),
    );
    h.worker.start();

    let (query, record, _) = next_result(&h.events);
    assert_eq!(
        query, "地球是圆的吗",
        "Result should carry the cleaned question"
    );
    assert!(record.is_some(), "Cleaned text should match the bank");

    assert!(h.worker.stop());
}

// ============================================================================
// Test 8: Missing Target Window Is Reported, Not Fatal
// ============================================================================

#[test]
fn test_missing_window_is_reported_not_fatal() {
    let mut h = build_worker(vec![frame(&["地球是圆的吗"])], 0, None, fast_config());
    h.worker.start();

    let (_, record, _) = next_result(&h.events);
    assert!(record.is_some(), "Matching is independent of the window");

    let error = next_event(&h.events);
    match error {
        WorkerEvent::Error { message, .. } => {
            assert!(
                message.contains("dispatch failed"),
                "Error event should carry the dispatch failure, got {:?}",
                message
            );
        }
        other => panic!("Expected an error event, got {:?}", other),
    }

    assert!(h.worker.stop(), "A failed dispatch must not wedge the worker");
    assert!(h.clicks.lock().unwrap().is_empty());
}
