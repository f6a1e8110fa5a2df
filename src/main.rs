use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autoquiz::bank::load_bank;
use autoquiz::config::Config;
use autoquiz::desktop::capture::XcapGrabber;
use autoquiz::desktop::dispatch::AnswerDispatcher;
use autoquiz::desktop::input::EnigoPointer;
use autoquiz::desktop::window::XcapWindowTracker;
use autoquiz::matching::FuzzyMatcher;
use autoquiz::ocr::CommandRecognizer;
use autoquiz::worker::{MissLog, Worker, WorkerConfig, WorkerEvent};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("autoquiz=info")),
        )
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    let bank = load_bank(&config.bank_path)?;
    if bank.is_empty() {
        anyhow::bail!("Question bank {} has no usable records", config.bank_path);
    }

    let recognizer = CommandRecognizer::from_command_line(&config.ocr_command)?;
    let pointer = EnigoPointer::new()?;
    let dispatcher = AnswerDispatcher::new(
        Box::new(pointer),
        Box::new(XcapWindowTracker::new(&config.window_title)),
    );

    let (mut worker, events) = Worker::new(
        Arc::new(bank),
        FuzzyMatcher::with_threshold(config.match_threshold),
        Box::new(XcapGrabber::new(&config.window_title)),
        Box::new(recognizer),
        dispatcher,
        MissLog::new(&config.miss_log_path),
        WorkerConfig {
            capture_region: None,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            min_interval: Duration::from_millis(config.min_interval_ms),
        },
    );

    tracing::info!("Answering questions in window {:?}", config.window_title);
    worker.start();

    for event in events {
        match event {
            WorkerEvent::Result {
                query,
                record,
                from_cache,
                ..
            } => match record {
                Some(record) => {
                    let cached = if from_cache { " (cached)" } else { "" };
                    tracing::info!(
                        "{} ---> {}{}",
                        query,
                        record.answer_text().unwrap_or(record.answer.as_str()),
                        cached
                    );
                }
                None => tracing::info!("No answer found for: {}", query),
            },
            WorkerEvent::Status { state, .. } => {
                tracing::info!("Worker state: {}", state.as_str());
            }
            WorkerEvent::Error { message, .. } => {
                tracing::error!("{}", message);
            }
        }
    }

    worker.stop();
    Ok(())
}
