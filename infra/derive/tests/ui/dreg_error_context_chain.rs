use dreg_derive::dreg_error;
use std::borrow::Cow;

#[dreg_error]
pub enum ScanError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid namespace{}: {message}", format_context(.context))]
    InvalidNamespace { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<String, ScanError> {
    let content = std::fs::read_to_string("/definitely/not/here.rs").context("Reading source")?;
    Ok(content)
}

fn reject() -> Result<(), ScanError> {
    Err(ScanError::InvalidNamespace { message: "".into(), context: None }).context("alpha")
}

fn main() {
    let err = read_missing().unwrap_err();
    assert!(err.to_string().starts_with("IO error (Reading source)"));

    let err = reject().unwrap_err();
    assert_eq!(err.to_string(), "Invalid namespace (alpha): ");
}
