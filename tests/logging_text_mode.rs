// Installing a global subscriber is once per process, so each mode gets its own test binary.

use assistant_service::config::Config;
use assistant_service::logging::{self, LogFormat, LoggingError, LoggingSettings};

#[test]
fn test_text_mode_selects_text_formatter() {
    std::env::set_var(logging::FORMAT_MODE_VAR, "text");
    let config = Config::from_env().unwrap();
    std::env::remove_var(logging::FORMAT_MODE_VAR);

    assert_eq!(logging::active_format(), None);

    let settings = LoggingSettings::load(&config.logging.config_path).unwrap();
    logging::init(config.logging.format, &settings).unwrap();
    assert_eq!(logging::active_format(), Some(LogFormat::Text));

    // Fixed for the rest of the process
    let err = logging::init(LogFormat::Json, &settings).unwrap_err();
    assert!(matches!(err, LoggingError::AlreadyInitialized));
    assert_eq!(logging::active_format(), Some(LogFormat::Text));

    tracing::info!(
        target: logging::ACCESS_TARGET,
        method = "GET",
        path = "/version",
        status = 200u16,
        "Request completed"
    );
}
