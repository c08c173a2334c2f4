use std::env;

use crate::errors::QueryError;

/// Number of passages requested from vector search when `NUMBER_OF_RESULTS` is unset.
pub const DEFAULT_NUMBER_OF_RESULTS: i32 = 10;
/// Validity of presigned download links when `URL_EXPIRATION_SECS` is unset.
pub const DEFAULT_URL_EXPIRATION_SECS: u64 = 3600;

const MAX_NUMBER_OF_RESULTS: i32 = 100;
// SigV4 presigned URLs cannot outlive seven days.
const MAX_URL_EXPIRATION_SECS: u64 = 604_800;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub knowledge_base_id: String,
    pub model_arn: String,
    pub number_of_results: i32,
    pub url_expiration_secs: u64,
}

impl AppConfig {
    /// Loads and validates configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ConfigError` naming the first missing or invalid variable.
    pub fn from_env() -> Result<Self, QueryError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ConfigError` naming the first missing or invalid variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QueryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let knowledge_base_id = required(&lookup, "KNOWLEDGE_BASE_ID")?;
        let model_arn = required(&lookup, "FM_ARN")?;
        if !model_arn.starts_with("arn:") {
            return Err(QueryError::ConfigError(format!(
                "FM_ARN: expected an ARN, got '{model_arn}'"
            )));
        }

        let number_of_results = match lookup("NUMBER_OF_RESULTS") {
            Some(raw) => parse_bounded(
                "NUMBER_OF_RESULTS",
                &raw,
                1,
                MAX_NUMBER_OF_RESULTS,
            )?,
            None => DEFAULT_NUMBER_OF_RESULTS,
        };

        let url_expiration_secs = match lookup("URL_EXPIRATION_SECS") {
            Some(raw) => parse_bounded(
                "URL_EXPIRATION_SECS",
                &raw,
                1,
                MAX_URL_EXPIRATION_SECS,
            )?,
            None => DEFAULT_URL_EXPIRATION_SECS,
        };

        Ok(Self {
            knowledge_base_id,
            model_arn,
            number_of_results,
            url_expiration_secs,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, QueryError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Some(_) => Err(QueryError::ConfigError(format!("{key}: must not be empty"))),
        None => Err(QueryError::ConfigError(format!("{key}: not set"))),
    }
}

fn parse_bounded<T>(key: &str, raw: &str, min: T, max: T) -> Result<T, QueryError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display,
{
    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| QueryError::ConfigError(format!("{key}: '{raw}' is not a number")))?;
    if value < min || value > max {
        return Err(QueryError::ConfigError(format!(
            "{key}: {value} is outside {min}..={max}"
        )));
    }
    Ok(value)
}
