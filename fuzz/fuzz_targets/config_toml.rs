#![no_main]

use libfuzzer_sys::fuzz_target;
use canieat_core::config::CanIEatConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(config) = CanIEatConfig::parse(content) {
            let _ = config.validate();
        }
    }
});
