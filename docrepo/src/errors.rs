use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for repository operations.
///
/// Each kind describes one category of failure, so callers can match on the
/// category instead of parsing messages.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::errors::{RepoError, ErrorKind, RepoResult};
///
/// fn example() -> RepoResult<()> {
///     Err(RepoError::new("no document matched", ErrorKind::NotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A model instance did not convert to a document value.
    InvalidArgument,
    /// A cached field is missing or no longer valid on a new instance of a
    /// known model type. Indicates a type-shape change at runtime.
    InvalidState,
    /// No document matched a unique-key lookup.
    NotFound,
    /// A field map failed validation against the model's shape.
    ValidationError,
    /// Error while evaluating a filter (e.g. an invalid LIKE pattern).
    FilterError,
    /// Error while creating or forwarding an index.
    IndexingError,
    /// Error surfaced verbatim from the underlying document store.
    BackendError,
    /// Error encoding or decoding a value.
    EncodingError,
    /// Internal error (usually indicates a bug).
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
            ErrorKind::InvalidState => write!(f, "Invalid state"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::IndexingError => write!(f, "Indexing error"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom error type for the repository toolkit.
///
/// `RepoError` carries a message, an [ErrorKind], an optional cause, and a
/// backtrace captured at construction time. Store-level failures are wrapped
/// with [ErrorKind::BackendError] and chained as the cause; the toolkit adds
/// no retry or translation on top of them.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::errors::{RepoError, ErrorKind};
///
/// let err = RepoError::new("field [age] does not exist", ErrorKind::ValidationError);
///
/// let cause = RepoError::new("connection reset", ErrorKind::BackendError);
/// let err = RepoError::new_with_cause("page query failed", ErrorKind::BackendError, cause);
/// ```
#[derive(Clone)]
pub struct RepoError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<RepoError>>,
    backtrace: Atomic<Backtrace>,
}

impl RepoError {
    /// Creates a new `RepoError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        RepoError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `RepoError` with a cause error attached.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: RepoError) -> Self {
        RepoError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&Box<RepoError>> {
        self.cause.as_ref()
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for repository operations.
///
/// `RepoResult<T>` is shorthand for `Result<T, RepoError>`. All fallible
/// operations in this crate return it.
pub type RepoResult<T> = Result<T, RepoError>;

impl From<regex::Error> for RepoError {
    fn from(err: regex::Error) -> Self {
        RepoError::new(
            &format!("Invalid pattern: {}", err),
            ErrorKind::FilterError,
        )
    }
}

impl From<String> for RepoError {
    fn from(msg: String) -> Self {
        RepoError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for RepoError {
    fn from(msg: &str) -> Self {
        RepoError::new(msg, ErrorKind::InternalError)
    }
}
