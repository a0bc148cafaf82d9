// This file implements the application's logging system.
// User-facing progress goes through colored INFO/WARN/ERROR macros on stderr;
// diagnostics go through `tracing` and only show up with `--debug`.

use tracing::Level;

/// `log_info!` for general progress messages.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_green("[INFO]"), format!($($arg)*)));
}

/// `log_warn!` for non-fatal conditions the user should know about.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_yellow("[WARN]"), format!($($arg)*)));
}

/// `log_error!` for failures that end the command.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_red("[ERROR]"), format!($($arg)*)));
}

/// `log_debug!` for internal tracing. Filtered by the subscriber installed in [`init`].
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => (tracing::debug!($($arg)*));
}

/// Installs the global `tracing` subscriber.
/// Call once at startup; later calls are ignored.
///
/// # Arguments
/// * `debug`: If `true`, debug diagnostics are printed; otherwise only INFO and above.
pub fn init(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init()
        .is_ok();

    if installed && debug {
        log_debug!("Logger initialized in DEBUG mode");
    }
}
