use chrono::Utc;
use reqwest::Url;

/// Query parameter overwritten by `--unique` with a nanosecond timestamp.
pub const UNIQUE_QUERY_KEY: &str = "__";

/// Sets the cache-busting parameter on `url`, keeping every other query pair.
pub(super) fn stamp_unique(url: &mut Url) {
    let stamp = now_nanos().to_string();
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != UNIQUE_QUERY_KEY)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (key, value) in &retained {
        pairs.append_pair(key, value);
    }
    pairs.append_pair(UNIQUE_QUERY_KEY, &stamp);
}

fn now_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000))
}
