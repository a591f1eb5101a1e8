#![no_main]

use libfuzzer_sys::fuzz_target;
use canieat_allergen_scanner::{ProductTable, find_by_barcode};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(table) = ProductTable::from_json(content) {
            for product in table.records() {
                // 중복 바코드는 첫 번째 레코드로 해석됨
                let found = find_by_barcode(&product.barcode, table.records())
                    .expect("barcode from the table must resolve");
                assert_eq!(found.barcode, product.barcode);
                assert!(table.find_by_id(&product.id).is_some());
            }
        }
    }
});
