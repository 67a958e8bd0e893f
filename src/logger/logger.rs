use serde::Serialize;
use crate::config::settings::{Logger, SETTINGS};

#[derive(Serialize)]
pub struct LoggerExtraFields {
    pub request_id: String,
}

pub fn setup_logger() {
    let setting_level = &SETTINGS.logger.clone().unwrap_or(Logger { level: "info".to_string()}).level;

    env_logger::builder()
        .filter_level(parse_level(setting_level))
        .format_timestamp_micros()
        .format(ecs_logger::format)
        .target(env_logger::Target::Stdout)
        .init();
}

/// Attaches the request id to every log line emitted by the current thread.
pub fn set_request_id(request_id: &str) {
    if let Err(e) = ecs_logger::extra_fields::set_extra_fields(LoggerExtraFields {
        request_id: request_id.to_string(),
    }) {
        log::warn!("failed to attach request id to log fields: {e}");
    }
}

pub fn clear_request_id() {
    ecs_logger::extra_fields::clear_extra_fields();
}

fn parse_level(level: &str) -> log::LevelFilter {
    match level {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), log::LevelFilter::Trace);
        assert_eq!(parse_level("debug"), log::LevelFilter::Debug);
        assert_eq!(parse_level("warn"), log::LevelFilter::Warn);
        assert_eq!(parse_level("error"), log::LevelFilter::Error);
        assert_eq!(parse_level("info"), log::LevelFilter::Info);
        assert_eq!(parse_level("verbose"), log::LevelFilter::Info);
    }
}
