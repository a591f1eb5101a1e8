#![no_main]

use libfuzzer_sys::fuzz_target;
use canieat_allergen_scanner::AllergenCatalog;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(catalog) = AllergenCatalog::from_json(content) {
            // 로드에 성공했다면 모든 id가 조회 가능해야 함
            for record in catalog.records() {
                assert!(catalog.get(&record.id).is_some());
            }
        }
    }
});
