use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::{PositiveU64, PositiveUsize, WrkArgs, parsers::parse_duration_arg};
use crate::config::apply_config;
use crate::config::types::{ConfigFile, DurationValue};
use crate::error::AppResult;
use crate::requests::{RequestPlan, RequestSource, RequestSpec, UNIQUE_QUERY_KEY};

thread_local! {
    static BASE_MATCHES: ArgMatches = WrkArgs::command().get_matches_from(["rwrk"]);
}

/// Parses a duration argument (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input)
}

/// Parses a duration value from config.
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_value_input(input: &str) -> AppResult<Duration> {
    DurationValue::Text(input.to_owned()).to_duration("timeout")
}

/// Parses TOML config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<()> {
    let config: ConfigFile = toml::from_str(input)?;
    apply_config_to_defaults(&config)
}

/// Parses JSON config and applies it to defaults.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<()> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(&config)
}

/// Parses a positive u64 string value.
///
/// # Errors
///
/// Returns an error when the value is invalid or zero.
pub fn parse_positive_u64_input(input: &str) -> AppResult<u64> {
    let value: PositiveU64 = input.parse()?;
    Ok(value.get())
}

/// Parses a positive usize string value.
///
/// # Errors
///
/// Returns an error when the value is invalid or zero.
pub fn parse_positive_usize_input(input: &str) -> AppResult<usize> {
    let value: PositiveUsize = input.parse()?;
    Ok(value.get())
}

/// Parses a request file body and validates every entry.
/// Returns the number of planned requests.
///
/// # Errors
///
/// Returns an error when the JSON is malformed or an entry is invalid.
pub fn plan_request_file_input(input: &[u8]) -> AppResult<u64> {
    let specs: Vec<RequestSpec> = serde_json::from_slice(input)?;
    let plan = RequestPlan::prepare(RequestSource::List(specs), false)?;
    Ok(plan.len())
}

/// Stamps a URL with the uniqueness parameter and returns the result.
///
/// # Errors
///
/// Returns an error when the URL is rejected.
pub fn stamp_unique_input(url: &str) -> AppResult<Option<String>> {
    let plan = RequestPlan::prepare(
        RequestSource::Repeat {
            url: url.to_owned(),
            count: 1,
        },
        true,
    )?;
    Ok(plan.into_descriptors().next().map(|descriptor| {
        debug_assert!(
            descriptor
                .target_url
                .query_pairs()
                .any(|(key, _)| key == UNIQUE_QUERY_KEY)
        );
        descriptor.target_url.to_string()
    }))
}

fn apply_config_to_defaults(config: &ConfigFile) -> AppResult<()> {
    BASE_MATCHES.with(|matches| {
        let mut args = WrkArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)
    })
}
