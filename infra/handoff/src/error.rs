use std::borrow::Cow;

/// Errors that can occur while handing a value over.
#[dreg_derive::dreg_error]
pub enum HandoffError {
    /// A value was already published into this slot.
    #[error("Already published{}: {message}", format_context(.context))]
    AlreadyPublished { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A consumer (callback or subscriber) already claimed this slot.
    #[error("Already consumed{}: {message}", format_context(.context))]
    AlreadyConsumed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Every producer handle was dropped before a value was published.
    #[error("Handoff closed{}: {message}", format_context(.context))]
    Closed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
