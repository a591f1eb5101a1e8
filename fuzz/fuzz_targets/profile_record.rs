#![no_main]

use libfuzzer_sys::fuzz_target;
use canieat_allergen_scanner::UserProfile;

fuzz_target!(|data: &[u8]| {
    let Ok(profile) = serde_json::from_slice::<UserProfile>(data) else {
        return;
    };

    let normalized = profile.normalized();
    // 정규화 후 재직렬화한 레코드는 같은 프로필로 읽혀야 함
    let json = serde_json::to_string(&normalized).expect("profile serializes");
    let reread: UserProfile = serde_json::from_str(&json).expect("written record parses");
    assert_eq!(reread, normalized);
    assert_eq!(reread.clone().normalized(), reread);
});
