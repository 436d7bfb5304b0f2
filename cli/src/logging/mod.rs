//! Tracing setup for the CLI
//!
//! Events go to stderr and, when requested, to a lazily created log file. The level
//! lives in an atomic so the filter can be raised after initialization.

mod lazy_file_writer;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

use lazy_file_writer::LazyFileWriter;
use strum_macros::{Display, EnumString};
use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(TracingLevel::Warn.as_u8());

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TracingLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl TracingLevel {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
            Self::Trace => 4,
        }
    }

    /// Level for `-v` repeated `count` times, starting from `warn`
    pub const fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    pub fn set_current(self) {
        CURRENT_LEVEL.store(self.as_u8(), Ordering::Relaxed);
    }
}

/// Level filter that reads `CURRENT_LEVEL` on every event
#[derive(Clone)]
pub struct DynamicFilter;

impl<S> Layer<S> for DynamicFilter
where
    S: Subscriber,
{
    fn enabled(
        &self,
        metadata: &tracing::Metadata<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) -> bool {
        if is_http_noise(metadata.target()) {
            return false;
        }

        let level_value = match *metadata.level() {
            Level::ERROR => 0,
            Level::WARN => 1,
            Level::INFO => 2,
            Level::DEBUG => 3,
            Level::TRACE => 4,
        };
        level_value <= CURRENT_LEVEL.load(Ordering::Relaxed)
    }
}

/// Connection-level logs from the HTTP stack, never useful when debugging calls
fn is_http_noise(target: &str) -> bool {
    ["reqwest::", "hyper", "h2::", "rustls::", "want::"]
        .iter()
        .any(|prefix| target.starts_with(prefix))
}

/// Install the global subscriber
pub fn init_tracing(level: TracingLevel, log_file: Option<PathBuf>) {
    level.set_current();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = log_file.map(|path| {
        tracing_subscriber::fmt::layer()
            .with_writer(LazyFileWriter::new(path))
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    Registry::default()
        .with(DynamicFilter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

/// Default log file location
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("farmhand_trace.log")
}
