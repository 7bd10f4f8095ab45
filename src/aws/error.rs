use std::fmt;

/// Coarse classification of a failed service call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Target resource is absent
    NotFound,
    /// Resource has live dependents (aliases, objects, tables)
    DependencyExists,
    /// Throttling, timeouts, service-side faults
    Transient,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::DependencyExists => write!(f, "dependency exists"),
            ErrorKind::Transient => write!(f, "transient"),
            ErrorKind::Other => write!(f, "error"),
        }
    }
}

const NOT_FOUND_PATTERNS: &[&str] = &[
    "ResourceNotFoundException",
    "NoSuchBucket",
    "NoSuchEntity",
    "EntityNotFoundException",
    "does not exist",
    "not found",
];

const DEPENDENCY_PATTERNS: &[&str] = &[
    "BucketNotEmpty",
    "DeleteConflict",
    "ResourceInUseException",
    "ConflictException",
    "is not empty",
];

const TRANSIENT_PATTERNS: &[&str] = &[
    "Throttling",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "SlowDown",
    "RequestTimeout",
    "ServiceUnavailable",
    "InternalFailure",
    "InternalServerException",
    "InternalError",
    "Could not connect to the endpoint URL",
    "Read timeout",
];

/// Error from a single aws CLI invocation
#[derive(Debug, Clone)]
pub struct AwsError {
    pub kind: ErrorKind,
    /// Service error code when one could be extracted, e.g. `NoSuchBucket`
    pub code: Option<String>,
    pub operation: String,
    pub message: String,
}

impl AwsError {
    pub fn new(kind: ErrorKind, operation: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(operation: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, operation, message)
    }

    pub fn dependency_exists(operation: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DependencyExists, operation, message)
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    /// Build an error from the stderr of a failed `aws` command
    pub fn from_stderr(operation: &str, stderr: &str) -> Self {
        let message = stderr.trim().to_string();
        Self {
            kind: classify(&message),
            code: extract_code(&message),
            operation: operation.to_string(),
            message,
        }
    }
}

impl fmt::Display for AwsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(
                f,
                "{} failed ({}, {}): {}",
                self.operation, self.kind, code, self.message
            ),
            None => write!(f, "{} failed ({}): {}", self.operation, self.kind, self.message),
        }
    }
}

impl std::error::Error for AwsError {}

/// Classify an error message by the service error codes it mentions
pub fn classify(message: &str) -> ErrorKind {
    // Transient and dependency codes take precedence over the loose
    // not-found phrases.
    if TRANSIENT_PATTERNS.iter().any(|p| message.contains(p)) {
        return ErrorKind::Transient;
    }
    if DEPENDENCY_PATTERNS.iter().any(|p| message.contains(p)) {
        return ErrorKind::DependencyExists;
    }
    if NOT_FOUND_PATTERNS.iter().any(|p| message.contains(p)) {
        return ErrorKind::NotFound;
    }
    ErrorKind::Other
}

/// Pull `Code` out of the CLI's "An error occurred (Code) when calling ..." line
fn extract_code(message: &str) -> Option<String> {
    let start = message.find("An error occurred (")? + "An error occurred (".len();
    let end = message[start..].find(')')? + start;
    let code = &message[start..end];
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

/// Error kind of an anyhow error, if it wraps an `AwsError`
pub fn error_kind(err: &anyhow::Error) -> ErrorKind {
    err.downcast_ref::<AwsError>()
        .map(|e| e.kind)
        .unwrap_or(ErrorKind::Other)
}
