use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No entries found")]
    EmptyResult,

    #[error("Upstream error{}: {message}", status_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_message() {
        assert_eq!(Error::EmptyResult.to_string(), "No entries found");
    }

    #[test]
    fn test_upstream_message_includes_status() {
        let err = Error::upstream(Some(429), "Too Many Requests");
        assert_eq!(err.to_string(), "Upstream error (429): Too Many Requests");

        let err = Error::upstream(None, "connection reset");
        assert_eq!(err.to_string(), "Upstream error: connection reset");
    }
}
