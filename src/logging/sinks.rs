// src/logging/sinks.rs

//! Subscriber construction for one wrapped execution.
//!
//! - Console sink: status lines only (target [`STATUS_TARGET`]), at the
//!   configured level and above, second-resolution local timestamps.
//! - File sink: every event at every level, millisecond timestamps, no
//!   colours.
//!
//! The resulting [`Dispatch`] is never installed globally; the execution
//! core scopes it around the futures of a single invocation.

use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::{self, time::ChronoLocal};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use super::{LogConfig, STATUS_TARGET, SharedWriter};

const CONSOLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Build the console + file subscriber for one log session.
pub fn session_dispatch(config: &LogConfig, file: SharedWriter) -> Dispatch {
    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(FILE_TIME_FORMAT.to_string()))
        .with_filter(LevelFilter::TRACE);

    let subscriber = Registry::default()
        .with(console_layer(config))
        .with(file_layer);

    Dispatch::new(subscriber)
}

/// Console-only subscriber, used when no log file could be opened.
pub fn console_dispatch(config: &LogConfig) -> Dispatch {
    Dispatch::new(Registry::default().with(console_layer(config)))
}

fn console_layer<S>(config: &LogConfig) -> impl Layer<S> + Send + Sync + 'static
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(config.console.clone())
        .with_ansi(config.console_ansi)
        .with_target(true)
        .with_timer(ChronoLocal::new(CONSOLE_TIME_FORMAT.to_string()))
        .with_filter(Targets::new().with_target(STATUS_TARGET, config.console_level))
}
