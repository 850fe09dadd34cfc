#![no_main]

use hardval::policy::load_policy_from_str;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string, ignoring invalid UTF-8
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        // We don't care about the result, just that it doesn't panic
        let _ = load_policy_from_str(yaml_str, "fuzz");
    }
});
