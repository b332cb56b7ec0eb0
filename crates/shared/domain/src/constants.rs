//! Well-known names shared by the builder, the emitter and the CLI.

/// Fully-qualified path of the default indexed trait.
pub const DESERIALIZE_PATH: &str = "serde::de::Deserialize";
/// Documentation page of the default indexed trait.
pub const DESERIALIZE_URL: &str = "https://docs.rs/serde/1/serde/de/trait.Deserialize.html";
/// Lifetime parameter carried by the `Deserialize` trait.
pub const DESERIALIZE_LIFETIME: &str = "'de";

/// Front-end callback invoked when it is already loaded.
pub const REGISTER_CALLBACK: &str = "register_implementors";
/// Slot the snippet falls back to when the callback is not there yet.
pub const PENDING_SLOT: &str = "pending_implementors";

/// Default directory for emitted artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "target/doc";
/// File name of the JSON artifact.
pub const JSON_FILE_NAME: &str = "implementors.json";
/// Directory (under the output dir) holding implementor snippets.
pub const IMPLEMENTORS_DIR: &str = "implementors";

/// Prefix of environment overrides, e.g. `DREG__OUTPUT__DIR`.
pub const ENV_PREFIX: &str = "DREG";
