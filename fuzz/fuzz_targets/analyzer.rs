#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use canieat_allergen_scanner::{ProductRecord, UserProfile, analyze};
use canieat_core::types::{AllergenRecord, SafetyStatus, Severity};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 카탈로그 레코드 (최대 16개로 제한)
    catalog: Vec<FuzzAllergen>,
    ingredients: Vec<String>,
    allergen_warnings: Vec<String>,
    profile_allergens: Vec<String>,
}

#[derive(Arbitrary, Debug)]
struct FuzzAllergen {
    id: String,
    name: String,
    aliases: Vec<String>,
}

fuzz_target!(|input: FuzzInput| {
    let catalog: Vec<AllergenRecord> = input
        .catalog
        .into_iter()
        .take(16)
        .map(|a| AllergenRecord {
            id: a.id,
            name: a.name,
            description: String::new(),
            aliases: a.aliases.into_iter().take(8).collect(),
            severity: Severity::Medium,
        })
        .collect();

    let product = ProductRecord {
        id: "fuzz".to_owned(),
        name: "Fuzz Product".to_owned(),
        brand: "Fuzz".to_owned(),
        barcode: "0".to_owned(),
        ingredients: input.ingredients.into_iter().take(64).collect(),
        allergen_warnings: input.allergen_warnings,
        image: None,
    };

    let profile = UserProfile {
        allergens: input.profile_allergens.into_iter().take(32).collect(),
        ..UserProfile::default()
    };

    let result = analyze(&product, &profile, &catalog);

    // 판정 우선순위: 직접 매칭 > 성분 매칭 > 안전
    let expected = if !result.direct_matches.is_empty() {
        SafetyStatus::Unsafe
    } else if !result.potential_matches.is_empty() {
        SafetyStatus::Caution
    } else {
        SafetyStatus::Safe
    };
    assert_eq!(result.safety_status, expected);

    for id in &result.direct_matches {
        assert!(profile.allergens.contains(id));
        assert!(product.allergen_warnings.contains(id));
    }
    for (i, phrase) in result.potential_matches.iter().enumerate() {
        assert!(!result.potential_matches[..i].contains(phrase));
        assert!(!result.direct_matches.contains(phrase));
    }
    assert!(result.matched_allergens.len() <= result.direct_matches.len());
});
