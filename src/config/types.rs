use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration;
use crate::args::{DumpDelimiter, OutputFormat};
use crate::error::{AppError, AppResult, ConfigError};

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub file: Option<String>,
    #[serde(alias = "concurrency")]
    pub concurrent: Option<usize>,
    #[serde(alias = "request")]
    pub requests: Option<u64>,
    pub unique: Option<bool>,
    pub dump: Option<String>,
    pub dump_delimiter: Option<DumpDelimiter>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub output_format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &str) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(0) => Err(AppError::config(ConfigError::DurationZero {
                field: field.to_owned(),
            })),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration(text).map_err(|err| {
                AppError::config(ConfigError::InvalidDuration {
                    field: field.to_owned(),
                    source: err,
                })
            }),
        }
    }
}
