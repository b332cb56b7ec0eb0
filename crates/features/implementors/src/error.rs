use std::borrow::Cow;

/// Errors raised while building or emitting an implementors registry.
#[dreg_derive::dreg_error]
pub enum RegistryError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// Directory traversal failed (permissions, broken symlinks).
    #[error("Walk error{}: {source}", format_context(.context))]
    Walk { source: walkdir::Error, context: Option<Cow<'static, str>> },

    /// A `Cargo.toml` could not be parsed.
    #[error("Manifest error{}: {source}", format_context(.context))]
    Manifest { source: toml::de::Error, context: Option<Cow<'static, str>> },

    /// A source file is not valid Rust.
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: syn::Error, context: Option<Cow<'static, str>> },

    #[error("Serialization error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Render error{}: {source}", format_context(.context))]
    Fmt { source: std::fmt::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid namespace{}: {source}", format_context(.context))]
    InvalidNamespace {
        source: dreg_domain::namespace::InvalidNamespace,
        context: Option<Cow<'static, str>>,
    },

    /// An entry failed validation (empty name, malformed URL).
    #[error("Invalid entry{}: {message}", format_context(.context))]
    InvalidEntry { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The registry could not be handed to the front-end.
    #[error("Handoff error{}: {source}", format_context(.context))]
    Handoff { source: dreg_handoff::HandoffError, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
