// Installing a global subscriber is once per process, so each mode gets its own test binary.

use assistant_service::config::Config;
use assistant_service::logging::{self, LogFormat, LoggingError, LoggingSettings};

#[test]
fn test_unset_mode_selects_json_formatter() {
    std::env::remove_var(logging::FORMAT_MODE_VAR);
    std::env::remove_var(logging::CONFIG_PATH_VAR);
    let config = Config::from_env().unwrap();

    // A broken artifact must be reported instead of silently falling back
    let err = LoggingSettings::load("config/does-not-exist.json").unwrap_err();
    assert!(matches!(err, LoggingError::Read { .. }));
    assert_eq!(logging::active_format(), None);

    let settings = LoggingSettings::load(&config.logging.config_path).unwrap();
    logging::init(config.logging.format, &settings).unwrap();
    assert_eq!(logging::active_format(), Some(LogFormat::Json));

    let err = logging::init(LogFormat::Text, &settings).unwrap_err();
    assert!(matches!(err, LoggingError::AlreadyInitialized));
    assert_eq!(logging::active_format(), Some(LogFormat::Json));
}
