use thiserror::Error;

#[derive(Debug, Error)]
pub enum FcmError {
    #[error(
        "missing Firebase env secrets: project_id={project_id}, client_email={client_email}, private_key={private_key}"
    )]
    MissingConfig {
        project_id: bool,
        client_email: bool,
        private_key: bool,
    },

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("failed to sign assertion")]
    Sign(#[from] jsonwebtoken::errors::Error),

    #[error("token request failed")]
    Transport(#[from] reqwest::Error),

    #[error("token error: status={status} body={body}")]
    TokenRejected { status: u16, body: String },

    #[error("token error: missing access_token body={body}")]
    MissingAccessToken { body: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn wrapped_errors_are_exposed_as_source_not_repeated() {
        let inner = jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat);
        let inner_text = inner.to_string();
        let err = FcmError::from(inner);

        assert_eq!(err.to_string(), "failed to sign assertion");
        assert_eq!(err.source().map(|s| s.to_string()), Some(inner_text));
    }
}
