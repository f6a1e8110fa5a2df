use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::bank::QaRecord;
use crate::desktop::capture::{CaptureRegion, ScreenGrabber};
use crate::desktop::dispatch::AnswerDispatcher;
use crate::error::AppError;
use crate::matching::{clean_text, FuzzyMatcher, ResultCache};
use crate::ocr::TextRecognizer;

use super::events::{WorkerEvent, WorkerState};
use super::miss_log::MissLog;

/// How long `stop()` waits for the loop to wind down before detaching the
/// thread.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Sleep slice while waiting out the intervals; the stop flag is
/// re-checked at this granularity, so stop latency stays bounded no
/// matter how large the configured intervals are.
const WAIT_SLICE: Duration = Duration::from_millis(50);

/// Polling step while `stop()` waits for the thread to finish.
const JOIN_POLL: Duration = Duration::from_millis(10);

/// Worker settings. Fixed once the worker starts, except the capture
/// region, which the owner may swap at any time through the handle.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Absolute screen rectangle to watch; None captures the target
    /// window instead.
    pub capture_region: Option<CaptureRegion>,
    /// Pause between loop iterations.
    pub poll_interval: Duration,
    /// Minimum spacing between two processed captures.
    pub min_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            capture_region: None,
            poll_interval: Duration::from_millis(500),
            min_interval: Duration::from_millis(1000),
        }
    }
}

/// Flags shared between the handle and the loop thread. One mutex guards
/// both, held only long enough to copy values in or out.
#[derive(Debug)]
struct Control {
    stop: bool,
    state: WorkerState,
    capture_region: Option<CaptureRegion>,
}

struct Shared {
    control: Mutex<Control>,
}

impl Shared {
    fn lock_control(&self) -> MutexGuard<'_, Control> {
        // the lock only guards plain flags, so a poisoned guard still
        // holds usable values
        self.control.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Handle to the background answering loop.
///
/// `start()` spawns the dedicated thread; `stop()` asks it to wind down
/// and waits a bounded amount of time. Once stopped, a worker stays
/// stopped; build a new one to go again.
pub struct Worker {
    shared: Arc<Shared>,
    runtime: Option<LoopContext>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Build a worker around its collaborators. The returned receiver
    /// sees every event in the exact order iterations complete.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bank: Arc<Vec<QaRecord>>,
        matcher: FuzzyMatcher,
        grabber: Box<dyn ScreenGrabber>,
        recognizer: Box<dyn TextRecognizer>,
        dispatcher: AnswerDispatcher,
        miss_log: MissLog,
        config: WorkerConfig,
    ) -> (Self, Receiver<WorkerEvent>) {
        let (events, receiver) = mpsc::channel();
        let shared = Arc::new(Shared {
            control: Mutex::new(Control {
                stop: false,
                state: WorkerState::Idle,
                capture_region: config.capture_region,
            }),
        });

        let context = LoopContext {
            bank,
            matcher,
            cache: ResultCache::new(),
            grabber,
            recognizer,
            dispatcher,
            miss_log,
            events,
            shared: shared.clone(),
            poll_interval: config.poll_interval,
            min_interval: config.min_interval,
        };

        (
            Self {
                shared,
                runtime: Some(context),
                handle: None,
            },
            receiver,
        )
    }

    /// Spawn the loop thread. Calling this while the worker is already
    /// running does nothing.
    pub fn start(&mut self) {
        let context = {
            let mut control = self.shared.lock_control();
            if control.state != WorkerState::Idle {
                tracing::debug!("Worker already running, start ignored");
                return;
            }
            let Some(context) = self.runtime.take() else {
                tracing::warn!("Worker already finished, start ignored");
                return;
            };
            control.stop = false;
            control.state = WorkerState::Running;
            context
        };

        self.handle = Some(thread::spawn(move || context.run()));
    }

    /// Request a stop and wait up to [`STOP_TIMEOUT`] for the thread to
    /// observe it. Returns true when the loop has exited; on timeout the
    /// thread is detached, and later calls keep returning false until
    /// the loop actually winds down to Idle.
    pub fn stop(&mut self) -> bool {
        {
            let mut control = self.shared.lock_control();
            match control.state {
                WorkerState::Idle => return true,
                WorkerState::Running => {
                    control.stop = true;
                    control.state = WorkerState::Stopping;
                }
                WorkerState::Stopping => {}
            }
        }

        let Some(handle) = self.handle.take() else {
            // a previous stop timed out and detached the thread; it has
            // stopped only once the loop has wound back to Idle
            return self.state() == WorkerState::Idle;
        };

        let deadline = Instant::now() + STOP_TIMEOUT;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(JOIN_POLL);
        }

        if handle.is_finished() {
            if handle.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
            true
        } else {
            tracing::warn!("Worker thread did not stop within {:?}, detaching", STOP_TIMEOUT);
            false
        }
    }

    pub fn state(&self) -> WorkerState {
        self.shared.lock_control().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == WorkerState::Running
    }

    /// Swap the watched screen region. Takes effect on the next
    /// iteration; None returns to capturing the target window.
    pub fn set_capture_region(&self, region: Option<CaptureRegion>) {
        self.shared.lock_control().capture_region = region;
    }

    pub fn capture_region(&self) -> Option<CaptureRegion> {
        self.shared.lock_control().capture_region
    }
}

/// Everything the loop thread owns.
struct LoopContext {
    bank: Arc<Vec<QaRecord>>,
    matcher: FuzzyMatcher,
    cache: ResultCache,
    grabber: Box<dyn ScreenGrabber>,
    recognizer: Box<dyn TextRecognizer>,
    dispatcher: AnswerDispatcher,
    miss_log: MissLog,
    events: Sender<WorkerEvent>,
    shared: Arc<Shared>,
    poll_interval: Duration,
    min_interval: Duration,
}

impl LoopContext {
    fn run(mut self) {
        tracing::info!("Worker loop started ({} bank records)", self.bank.len());
        if !self.emit(WorkerEvent::status(WorkerState::Running)) {
            self.finish();
            return;
        }

        let mut last_done: Option<Instant> = None;
        let mut last_text = String::new();

        loop {
            if self.should_stop() {
                break;
            }

            // keep iterations at least min_interval apart, sleeping in
            // small slices so a stop request is noticed quickly
            if let Some(done) = last_done {
                if done.elapsed() < self.min_interval {
                    thread::sleep(WAIT_SLICE);
                    continue;
                }
            }

            let alive = match self.tick(&mut last_text) {
                Ok(alive) => alive,
                Err(err) => {
                    // a failed iteration is an event, never the end of
                    // the loop
                    tracing::error!("Worker iteration failed: {}", err);
                    self.emit(WorkerEvent::error(err.to_string()))
                }
            };
            last_done = Some(Instant::now());

            if !alive || !self.pace() {
                break;
            }
        }

        self.finish();
    }

    /// One capture -> recognize -> match -> dispatch pass. Returns false
    /// when the event channel is gone and the loop should end.
    fn tick(&mut self, last_text: &mut String) -> Result<bool, AppError> {
        let region = self.snapshot_region();

        let image = self
            .grabber
            .grab(region)
            .map_err(|e| AppError::CaptureFailure(e.to_string()))?;

        let fragments = self
            .recognizer
            .recognize(&image)
            .map_err(|e| AppError::RecognitionFailure(e.to_string()))?;

        let question = clean_text(&fragments.concat());
        if question.is_empty() {
            return Ok(true);
        }

        // the same question sitting on screen across ticks gets exactly
        // one match and one click
        if question == *last_text {
            tracing::debug!("Same question still on screen, skipping");
            return Ok(true);
        }
        *last_text = question.clone();

        let key = ResultCache::key_for(&question);
        let (record, from_cache) = match self.cache.get(&key) {
            Some(hit) => {
                tracing::debug!("Cache hit for {:?}", key);
                (Some(hit.clone()), true)
            }
            None => {
                let found = self.matcher.best_match(&question, &self.bank).cloned();
                if let Some(ref record) = found {
                    self.cache.put(key, record.clone());
                }
                (found, false)
            }
        };

        if record.is_none() {
            self.miss_log.append(&question);
        }

        if !self.emit(WorkerEvent::result(question, record.clone(), from_cache)) {
            return Ok(false);
        }

        if let Some(record) = record {
            if let Err(err) = self.dispatcher.dispatch_to_target(record.answer.as_str()) {
                tracing::error!("Failed to dispatch answer: {}", err);
                if !self.emit(WorkerEvent::error(err.to_string())) {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    /// Sleep out the poll interval in slices, bailing early on a stop
    /// request. Returns false when the loop should end.
    fn pace(&self) -> bool {
        let deadline = Instant::now() + self.poll_interval;
        loop {
            if self.should_stop() {
                return false;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return true;
            }
            thread::sleep(remaining.min(WAIT_SLICE));
        }
    }

    fn should_stop(&self) -> bool {
        self.shared.lock_control().stop
    }

    fn snapshot_region(&self) -> Option<CaptureRegion> {
        self.shared.lock_control().capture_region
    }

    fn emit(&self, event: WorkerEvent) -> bool {
        if self.events.send(event).is_err() {
            tracing::warn!("Event channel closed, worker loop winding down");
            false
        } else {
            true
        }
    }

    fn finish(&self) {
        self.shared.lock_control().state = WorkerState::Idle;
        let _ = self.events.send(WorkerEvent::status(WorkerState::Idle));
        tracing::info!("Worker loop exited");
    }
}
