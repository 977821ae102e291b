use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid auth token spec '{0}', expected \"subject:token\"")]
    InvalidAuthToken(String),
}

/// A configured API credential: the bearer token and the subject it
/// authenticates as.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthToken {
    pub subject: String,
    pub token: String,
}

/// Parse a `--auth-token` argument of the form `subject:token`.
pub fn parse_auth_token(spec: &str) -> Result<AuthToken, ConfigError> {
    match spec.split_once(':') {
        Some((subject, token)) if !subject.is_empty() && !token.is_empty() => Ok(AuthToken {
            subject: subject.to_string(),
            token: token.to_string(),
        }),
        _ => Err(ConfigError::InvalidAuthToken(spec.to_string())),
    }
}
