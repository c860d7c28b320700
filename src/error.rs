// ⚠️ Fetch errors - every way a remote call can fail
// One error type for page loads and overlay loads alike

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (DNS, connect, timeout, broken body)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Body was not the JSON shape we expected
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Http { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            url: "http://x/pokemon/1".to_string(),
            status: 404,
        };

        assert_eq!(err.to_string(), "request to http://x/pokemon/1 returned status 404");
        assert_eq!(err.url(), "http://x/pokemon/1");
    }
}
