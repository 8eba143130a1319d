//! Logging for the `retail-pos` binary.
//!
//! Logging starts before the store settings are read so that loader events
//! are captured. The settings can then raise or lower the level and attach a
//! log file; records written before a file is attached go to stderr only.

use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber, debug};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

const DEFAULT_DIRECTIVE: &str = "info";

/// One line per event: local timestamp, level, source location, fields.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if ansi {
            let colour = match *meta.level() {
                Level::ERROR => "1;31",
                Level::WARN => "1;33",
                Level::INFO => "1;32",
                Level::DEBUG => "1;34",
                Level::TRACE => "1;35",
            };
            write!(writer, "\x1b[2m{timestamp}\x1b[0m \x1b[{colour}m{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{timestamp} {:>5} ", meta.level())?;
        }

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            let file = file.rsplit_once("src/").map_or(file, |(_, rest)| rest);
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Writer target for the file layer. Discards records until a file is
/// attached.
#[derive(Clone, Default)]
struct LogFile(Arc<Mutex<Option<File>>>);

impl LogFile {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(self.lock())
    }
}

type ReloadFilter = Box<dyn Fn(EnvFilter) -> Result<()> + Send + Sync>;

static RELOAD_FILTER: OnceLock<ReloadFilter> = OnceLock::new();
static LOG_FILE: OnceLock<LogFile> = OnceLock::new();

/// Chooses the filter directive: `RUST_LOG` wins, then the configured level,
/// then `info`.
fn choose_directive(
    env: Option<&str>,
    configured: Option<&str>,
) -> String {
    env.or(configured)
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVE)
        .to_string()
}

/// Installs the global subscriber. Call once, before anything logs.
///
/// - stderr: coloured on a terminal, plain when redirected.
/// - file: inactive until [`attach_log_file`] is called.
/// - level: `RUST_LOG` when set, otherwise `info`.
pub fn init_logging() {
    let directive = choose_directive(std::env::var("RUST_LOG").ok().as_deref(), None);
    let (filter, handle) = reload::Layer::new(EnvFilter::new(directive));

    let log_file = LOG_FILE.get_or_init(LogFile::default).clone();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(log_file);

    if tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = RELOAD_FILTER.set(Box::new(move |filter| {
            handle
                .reload(filter)
                .map_err(|e| anyhow::anyhow!("filter reload failed: {e}"))
        }));
    }
}

/// Applies the `[logging]` level from the store settings.
///
/// Ignored when `RUST_LOG` is set.
///
/// # Errors
///
/// Fails when the level is not a valid filter directive or logging has not
/// been initialised.
pub fn apply_configured_level(level: Option<&str>) -> Result<()> {
    let env = std::env::var("RUST_LOG").ok();
    if env.is_some() || level.is_none() {
        return Ok(());
    }
    let directive = choose_directive(None, level);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log level '{directive}'"))?;

    match RELOAD_FILTER.get() {
        Some(reload) => {
            reload(filter)?;
            debug!(%directive, "log level set from settings");
            Ok(())
        }
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Appends log records to `path` from now on, replacing any earlier file.
/// The directory must already exist.
///
/// # Errors
///
/// Fails when the file cannot be opened or logging has not been initialised.
pub fn attach_log_file(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    match LOG_FILE.get() {
        Some(slot) => {
            *slot.lock() = Some(file);
            debug!(path = %path.display(), "log file attached");
            Ok(())
        }
        None => anyhow::bail!("logging not yet initialized"),
    }
}
