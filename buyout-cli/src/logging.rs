//! Log output for the command-line tool.
//!
//! Logging is set up once, after the command line and config file have been
//! read. Results are printed on stdout, so log lines go to stderr and, when
//! asked for, to an appended log file.

use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when neither a level nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Where log lines go and how much is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter directive such as `"debug"` or `"info,buyout_core=trace"`.
    pub level: Option<String>,
    /// File that log lines are appended to.
    pub file: Option<PathBuf>,
    /// Keep stderr free of log lines.
    pub quiet: bool,
}

impl LogSettings {
    /// The explicit level wins, then `RUST_LOG`, then [`DEFAULT_FILTER`].
    pub fn filter(&self) -> Result<EnvFilter> {
        match &self.level {
            Some(level) => {
                EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))
            }
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
        }
    }
}

/// `LEVEL target: message fields`, optionally prefixed with the local time.
///
/// Terminal output leaves the time off; the log file keeps it.
struct CliFormat {
    timestamps: bool,
}

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "31",
        Level::WARN => "33",
        Level::INFO => "32",
        Level::DEBUG => "34",
        Level::TRACE => "35",
    }
}

impl<S, N> FormatEvent<S, N> for CliFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if self.timestamps {
            write!(writer, "{} ", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
        }

        let level = meta.level();
        if writer.has_ansi_escapes() {
            write!(writer, "\x1b[{}m{level:<5}\x1b[0m ", level_color(level))?;
        } else {
            write!(writer, "{level:<5} ")?;
        }

        write!(writer, "{}: ", meta.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

/// Installs the global subscriber described by `settings`. Call once.
pub fn init_logging(settings: &LogSettings) -> Result<()> {
    let filter = settings.filter()?;

    let console = (!settings.quiet).then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(CliFormat { timestamps: false })
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
    });

    let file = match &settings.file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .event_format(CliFormat { timestamps: true })
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("logging is already initialized")
}
