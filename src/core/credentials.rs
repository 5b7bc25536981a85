use std::env;
use std::error::Error as StdError;
use std::fmt;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    Missing,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Missing => write!(
                f,
                "❌ Error: {API_KEY_ENV} environment variable not set\n\n\
                 Please set your Gemini API key:\n\
                 export {API_KEY_ENV}=\"your-api-key-here\"\n\n\
                 ({FALLBACK_API_KEY_ENV} is also accepted.)"
            ),
        }
    }
}

impl StdError for CredentialError {}

pub fn resolve_api_key() -> Result<String, CredentialError> {
    resolve_api_key_with(|name| env::var(name).ok())
}

/// Looks the key up through `lookup`, preferring the primary variable and
/// skipping blank values.
pub fn resolve_api_key_with<F>(lookup: F) -> Result<String, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    [API_KEY_ENV, FALLBACK_API_KEY_ENV]
        .into_iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(CredentialError::Missing)
}
