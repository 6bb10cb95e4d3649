use reqwest::StatusCode;
use response::ErrorBody;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("authentication failed ({status}): {body}")]
    Authentication { status: StatusCode, body: String },

    #[error("server returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// An error object sent with a success status, as a whole body or as a
    /// stream event.
    #[error("server reported an error: {0}")]
    Server(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Classifies a non-success HTTP status. 401 and 403 are authentication
    /// failures, everything else is reported as an API error.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ClientError::Authentication { status, body }
            }
            _ => ClientError::Api { status, body },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ClientError::InvalidConfig(err.to_string())
        } else if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::Connection(err.to_string())
        }
    }
}

impl From<ErrorBody> for ClientError {
    fn from(err: ErrorBody) -> Self {
        ClientError::Server(err.to_string())
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_authentication() {
        let e = ClientError::from_status(StatusCode::UNAUTHORIZED, "bad key".into());
        assert!(matches!(e, ClientError::Authentication { .. }));
        assert!(e.to_string().contains("401"));
        assert!(e.to_string().contains("bad key"));
    }

    #[test]
    fn forbidden_is_authentication() {
        let e = ClientError::from_status(StatusCode::FORBIDDEN, String::new());
        assert!(matches!(e, ClientError::Authentication { .. }));
    }

    #[test]
    fn other_status_is_api_error() {
        let e = ClientError::from_status(StatusCode::NOT_FOUND, "model not found".into());
        assert!(matches!(
            e,
            ClientError::Api {
                status: StatusCode::NOT_FOUND,
                ..
            }
        ));
        assert!(e.to_string().contains("model not found"));
    }

    #[test]
    fn json_error_is_malformed_response() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let e: ClientError = json_err.into();
        assert!(e.to_string().starts_with("malformed response"));
    }

    #[test]
    fn error_body_is_server_error() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message":"context size exceeded","type":"exceed_context_size_error"}"#,
        )
        .unwrap();
        let e: ClientError = body.into();
        assert!(matches!(e, ClientError::Server(_)));
        assert_eq!(
            e.to_string(),
            "server reported an error: context size exceeded (exceed_context_size_error)"
        );
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let e: ClientError = io_err.into();
        assert!(e.to_string().contains("stdout closed"));
    }

    #[test]
    fn invalid_config_display() {
        let e = ClientError::InvalidConfig("base_url must be a valid URL".into());
        assert_eq!(
            e.to_string(),
            "invalid configuration: base_url must be a valid URL"
        );
    }
}
