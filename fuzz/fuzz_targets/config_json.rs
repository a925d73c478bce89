#![no_main]

use libfuzzer_sys::fuzz_target;
use rwrk::config::types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    let parsed: Option<ConfigFile> = serde_json::from_slice(data).ok();
    let applied = rwrk::fuzzing::apply_config_from_json(data);
    if applied.is_ok() {
        if let Some(config) = parsed {
            debug_assert!(config.concurrent != Some(0));
            debug_assert!(config.requests != Some(0));
        }
    }
});
