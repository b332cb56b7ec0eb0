use dreg_logger::{Logger, level_from_verbosity};
use tracing::Level;

#[test]
fn single_v_with_target_filter() {
    let logger = Logger::builder()
        .name("dreg")
        .level(level_from_verbosity(1))
        .env_filter("verbosity_filter::noisy=error")
        .console(true)
        .init()
        .expect("logger should initialize");

    assert!(logger.guard().is_none(), "console-only logger should not create a file guard");
    assert!(tracing::enabled!(Level::INFO));
    assert!(!tracing::enabled!(Level::DEBUG));
    assert!(tracing::enabled!(target: "verbosity_filter::noisy", Level::ERROR));
    assert!(!tracing::enabled!(target: "verbosity_filter::noisy", Level::WARN));
}
