use std::{error::Error as StdError, fmt};

/// Closed classification of everything that can go wrong on a remote call.
///
/// Transport implementations must map their native errors onto exactly one of
/// these kinds; callers branch on the kind, never on error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The call did not complete within its deadline.
    Timeout,
    /// DNS resolution or TCP/TLS connect failed.
    Connect,
    /// The request could not be built or sent.
    Request,
    /// Reading the response body failed.
    Body,
    /// The body was read but is not the expected shape.
    Decode,
    /// The server answered with a non-2xx status.
    Status,
    Unknown,
}

impl ApiErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct ApiError {
    kind: ApiErrorKind,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    source: Option<anyhow::Error>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            url: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Connect, message)
    }

    pub fn status_error(status: u16, url: impl Into<String>, preview: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Status, preview)
            .with_status(status)
            .with_url(url)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_source<E>(mut self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(anyhow::Error::new(err));
        self
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the server answered with exactly `code`.
    pub fn is_status(&self, code: u16) -> bool {
        self.kind == ApiErrorKind::Status && self.status == Some(code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_status_and_url() {
        let err = ApiError::status_error(401, "https://example.com/api/users/auth/me", "unauthorized");
        let msg = err.to_string();
        assert!(msg.contains("kind=status"));
        assert!(msg.contains("status=401"));
        assert!(msg.contains("url=https://example.com/api/users/auth/me"));
        assert!(msg.ends_with(": unauthorized"));
    }

    #[test]
    fn test_display_without_status() {
        let err = ApiError::timeout("deadline elapsed");
        assert_eq!(err.to_string(), "api error kind=timeout: deadline elapsed");
        assert_eq!(err.status(), None);
        assert!(err.url().is_none());
    }

    #[test]
    fn test_is_status_requires_status_kind() {
        let err = ApiError::status_error(409, "u", "conflict");
        assert!(err.is_status(409));
        assert!(!err.is_status(500));

        let other = ApiError::new(ApiErrorKind::Decode, "bad json").with_status(409);
        assert!(!other.is_status(409));
    }

    #[test]
    fn test_source_is_exposed() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::connect("connect failed").with_source(io);
        assert!(StdError::source(&err).is_some());
    }
}
