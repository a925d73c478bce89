#![no_main]

use libfuzzer_sys::fuzz_target;
use rwrk::requests::RequestSpec;

fuzz_target!(|data: &[u8]| {
    let parsed: Option<Vec<RequestSpec>> = serde_json::from_slice(data).ok();
    if let Ok(count) = rwrk::fuzzing::plan_request_file_input(data) {
        if let Some(specs) = parsed {
            debug_assert_eq!(usize::try_from(count).ok(), Some(specs.len()));
        }
    }
});
