use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

type Output = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the process-wide subscriber: one output layer behind an `EnvFilter`.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = directive_filter(&cfg.level)?;
    let output = output_layer(cfg)?;

    tracing_subscriber::registry()
        .with(output.with_filter(filter))
        .try_init()
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("already") {
                LoggerError::AlreadyInitialized
            } else {
                LoggerError::InitializationFailed(msg)
            }
        })
}

pub(crate) fn directive_filter(directive: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(directive).map_err(|e| LoggerError::InvalidLogLevel {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}

fn output_layer(cfg: &LoggerConfig) -> Result<Output, LoggerError> {
    let layer = match cfg.format {
        LoggerFormat::Text => fmt::layer()
            .with_ansi(cfg.use_color)
            .with_target(cfg.with_targets)
            .with_timer(local_rfc3339())
            .boxed(),
        // one object per line, span fields merged into the event
        LoggerFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_ansi(false)
            .with_target(cfg.with_targets)
            .with_timer(local_rfc3339())
            .boxed(),
        LoggerFormat::Journald => journald_layer()?,
    };
    Ok(layer)
}

fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald_layer() -> Result<Output, LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald socket: {e}")))?
        .with_syslog_identifier("yca".to_string());
    Ok(layer.boxed())
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald_layer() -> Result<Output, LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_directives() {
        assert!(directive_filter("info").is_ok());
        assert!(directive_filter("yca_core=debug,tower_http=warn,info").is_ok());
    }

    #[test]
    fn filter_rejects_bad_level() {
        match directive_filter("yca_core=loud") {
            Err(LoggerError::InvalidLogLevel { directive, .. }) => {
                assert_eq!(directive, "yca_core=loud")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn second_install_reports_already_initialized() {
        let text = LoggerConfig::default();
        let json = LoggerConfig::new(LoggerFormat::Json, "debug");
        // the first call may lose to another test in this binary
        let _ = install(&text);
        assert!(matches!(
            install(&json),
            Err(LoggerError::AlreadyInitialized)
        ));
    }

    #[cfg(not(all(target_os = "linux", feature = "journald")))]
    #[test]
    fn journald_output_needs_feature() {
        let cfg = LoggerConfig::new(LoggerFormat::Journald, "info");
        assert!(matches!(
            output_layer(&cfg),
            Err(LoggerError::JournaldNotSupported)
        ));
    }
}
