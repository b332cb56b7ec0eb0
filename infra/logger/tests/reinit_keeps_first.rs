use dreg_logger::{Logger, LoggerError, level_from_verbosity};
use tracing::Level;

#[test]
fn second_init_fails_and_first_level_stays() {
    let _logger = Logger::builder()
        .name("dreg")
        .level(level_from_verbosity(0))
        .env_filter("hyper=off")
        .init()
        .expect("first init should succeed");

    let err = Logger::builder()
        .name("dreg-verbose")
        .level(level_from_verbosity(3))
        .init()
        .expect_err("second init should fail");
    assert!(matches!(err, LoggerError::Subscriber { .. }));

    assert!(tracing::enabled!(Level::WARN));
    assert!(!tracing::enabled!(Level::INFO), "quiet default must survive a rejected re-init");
}
