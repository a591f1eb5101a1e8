//! 안전 판정 -- 제품과 사용자 프로필을 대조하여 섭취 안전성 분류
//!
//! [`analyze`]는 세 입력에 대한 순수 함수입니다. I/O, 로깅, 메트릭 기록이 없으며
//! 같은 입력에 대해 항상 같은 결과를 돌려줍니다. 관측(로그/메트릭)은 호출하는
//! [`AllergenScanner`](crate::scanner::AllergenScanner)가 담당합니다.
//!
//! # 판정 단계
//!
//! 1. **직접 매칭**: `profile.allergens` 순서대로, 제품 `allergen_warnings`에 포함된 id
//! 2. **후보 문구**: 카탈로그 순서대로 프로필 알레르겐을 해석하여 이름과 별칭을 소문자로 펼침
//! 3. **잠재 매칭**: 성분 (소문자) 순서, 후보 문구 순서로 부분 문자열 검사.
//!    처음 발견된 문구만 추가 (직접 매칭/기존 잠재 매칭과 같으면 제외)
//! 4. **상태**: 직접 매칭 있음 -> `Unsafe`, 잠재 매칭 있음 -> `Caution`, 그 외 `Safe`
//! 5. **알레르겐 해석**: 직접 매칭 id를 카탈로그 레코드로 변환 (미해석 id는 건너뜀)
//!
//! 심각도는 판정에 영향을 주지 않습니다.

use serde::{Deserialize, Serialize};

use canieat_core::types::{AllergenRecord, SafetyStatus};

use crate::types::{ProductRecord, UserProfile};

/// 안전 판정 결과 (저장되지 않음)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 판정 상태
    pub safety_status: SafetyStatus,
    /// 제품이 명시적으로 선언한 사용자 알레르겐 id (프로필 순서)
    pub direct_matches: Vec<String>,
    /// 성분 텍스트에서 발견된 소문자 이름/별칭 (첫 발견 순서, 중복 없음)
    pub potential_matches: Vec<String>,
    /// 직접 매칭 id에 해당하는 카탈로그 레코드
    pub matched_allergens: Vec<AllergenRecord>,
}

impl AnalysisResult {
    /// 근거가 전혀 없는 안전 결과를 생성합니다.
    pub fn safe() -> Self {
        Self {
            safety_status: SafetyStatus::Safe,
            direct_matches: Vec::new(),
            potential_matches: Vec::new(),
            matched_allergens: Vec::new(),
        }
    }

    /// `Safe` 판정인지 확인합니다.
    pub fn is_safe(&self) -> bool {
        self.safety_status == SafetyStatus::Safe
    }

    /// 직접 매칭된 알레르겐 표시명 목록을 반환합니다.
    pub fn matched_names(&self) -> Vec<String> {
        self.matched_allergens
            .iter()
            .map(|record| record.name.clone())
            .collect()
    }
}

/// 제품이 사용자에게 안전한지 판정합니다.
///
/// 에러를 반환하지 않습니다. 빈 목록이나 카탈로그에 없는 id는 단순히 매칭 없음으로
/// 취급됩니다.
pub fn analyze(
    product: &ProductRecord,
    profile: &UserProfile,
    catalog: &[AllergenRecord],
) -> AnalysisResult {
    if profile.allergens.is_empty() {
        return AnalysisResult::safe();
    }

    // 1. 직접 매칭
    let direct_matches: Vec<String> = profile
        .allergens
        .iter()
        .filter(|id| product.allergen_warnings.contains(id))
        .cloned()
        .collect();

    // 2. 후보 문구
    let phrases: Vec<String> = catalog
        .iter()
        .filter(|record| profile.allergens.contains(&record.id))
        .flat_map(AllergenRecord::match_phrases)
        .collect();

    // 3. 잠재 매칭
    // direct_matches는 id 목록이라 문구와 겹치는 경우가 드물다.
    let mut potential_matches: Vec<String> = Vec::new();
    for ingredient in &product.ingredients {
        let lowered = ingredient.to_lowercase();
        for phrase in &phrases {
            if lowered.contains(phrase.as_str())
                && !direct_matches.contains(phrase)
                && !potential_matches.contains(phrase)
            {
                potential_matches.push(phrase.clone());
            }
        }
    }

    // 4. 상태
    let safety_status = if !direct_matches.is_empty() {
        SafetyStatus::Unsafe
    } else if !potential_matches.is_empty() {
        SafetyStatus::Caution
    } else {
        SafetyStatus::Safe
    };

    // 5. 알레르겐 해석
    let matched_allergens = direct_matches
        .iter()
        .filter_map(|id| catalog.iter().find(|record| &record.id == id))
        .cloned()
        .collect();

    AnalysisResult {
        safety_status,
        direct_matches,
        potential_matches,
        matched_allergens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canieat_core::types::Severity;

    fn allergen(id: &str, name: &str, aliases: &[&str]) -> AllergenRecord {
        AllergenRecord {
            id: id.to_owned(),
            name: name.to_owned(),
            description: String::new(),
            aliases: aliases.iter().map(|s| (*s).to_owned()).collect(),
            severity: Severity::Medium,
        }
    }

    fn catalog() -> Vec<AllergenRecord> {
        vec![
            allergen("peanuts", "Peanuts", &["peanut", "groundnut", "arachis"]),
            allergen("milk", "Milk", &["dairy", "whey", "cream", "butter"]),
            allergen("eggs", "Eggs", &["egg", "albumin"]),
        ]
    }

    fn product(ingredients: &[&str], warnings: &[&str]) -> ProductRecord {
        ProductRecord {
            id: "p".to_owned(),
            name: "Test".to_owned(),
            brand: "Brand".to_owned(),
            barcode: "000".to_owned(),
            ingredients: ingredients.iter().map(|s| (*s).to_owned()).collect(),
            allergen_warnings: warnings.iter().map(|s| (*s).to_owned()).collect(),
            image: None,
        }
    }

    fn profile(allergens: &[&str]) -> UserProfile {
        UserProfile {
            allergens: allergens.iter().map(|s| (*s).to_owned()).collect(),
            ..UserProfile::default()
        }
    }

    #[test]
    fn direct_match_is_unsafe() {
        let result = analyze(
            &product(&["Peanuts", "Salt"], &["peanuts"]),
            &profile(&["peanuts"]),
            &catalog(),
        );
        assert_eq!(result.safety_status, SafetyStatus::Unsafe);
        assert_eq!(result.direct_matches, vec!["peanuts"]);
        assert_eq!(result.matched_allergens.len(), 1);
        assert_eq!(result.matched_allergens[0].name, "Peanuts");
    }

    #[test]
    fn direct_matches_follow_profile_order() {
        let result = analyze(
            &product(&[], &["peanuts", "milk", "eggs"]),
            &profile(&["eggs", "peanuts"]),
            &catalog(),
        );
        assert_eq!(result.direct_matches, vec!["eggs", "peanuts"]);
        let names = result.matched_names();
        assert_eq!(names, vec!["Eggs", "Peanuts"]);
    }

    #[test]
    fn alias_in_ingredient_is_caution() {
        let result = analyze(&product(&["Butter"], &[]), &profile(&["milk"]), &catalog());
        assert_eq!(result.safety_status, SafetyStatus::Caution);
        assert_eq!(result.potential_matches, vec!["butter"]);
        assert!(result.direct_matches.is_empty());
        assert!(result.matched_allergens.is_empty());
    }

    #[test]
    fn substring_match_inside_compound_ingredient() {
        let result = analyze(
            &product(&["Sugar", "Unsalted Butter (Cream, Salt)"], &[]),
            &profile(&["milk"]),
            &catalog(),
        );
        // 문구 순서: milk, dairy, whey, cream, butter
        assert_eq!(result.potential_matches, vec!["cream", "butter"]);
    }

    #[test]
    fn potential_matches_are_distinct_in_first_discovery_order() {
        let result = analyze(
            &product(&["Whey Protein", "Egg Whites", "Sweet Whey"], &[]),
            &profile(&["milk", "eggs"]),
            &catalog(),
        );
        assert_eq!(result.potential_matches, vec!["whey", "egg"]);
    }

    #[test]
    fn phrase_equal_to_direct_match_id_is_filtered() {
        let result = analyze(
            &product(&["Milk Chocolate"], &["milk"]),
            &profile(&["milk"]),
            &catalog(),
        );
        assert_eq!(result.safety_status, SafetyStatus::Unsafe);
        assert_eq!(result.direct_matches, vec!["milk"]);
        // "milk" 문구는 id "milk"와 같은 문자열이므로 제외된다
        assert!(result.potential_matches.is_empty());
    }

    #[test]
    fn phrase_differing_from_id_survives_direct_match() {
        let result = analyze(
            &product(&["Peanut Butter"], &["peanuts"]),
            &profile(&["peanuts"]),
            &catalog(),
        );
        // "peanuts"는 성분에 없고, "peanut"은 id와 다른 문자열이므로 남는다
        assert_eq!(result.direct_matches, vec!["peanuts"]);
        assert_eq!(result.potential_matches, vec!["peanut"]);
    }

    #[test]
    fn alias_universe_follows_catalog_order() {
        let result = analyze(
            &product(&["Egg and Peanut Mix"], &[]),
            &profile(&["eggs", "peanuts"]),
            &catalog(),
        );
        // 카탈로그 순서 (peanuts -> eggs)로 문구를 검사
        assert_eq!(result.potential_matches, vec!["peanut", "egg"]);
    }

    #[test]
    fn empty_profile_is_safe() {
        let result = analyze(
            &product(&["Peanuts", "Milk"], &["peanuts", "milk"]),
            &UserProfile::default(),
            &catalog(),
        );
        assert_eq!(result, AnalysisResult::safe());
        assert!(result.is_safe());
    }

    #[test]
    fn unknown_profile_ids_never_crash() {
        let result = analyze(
            &product(&["Lupin Flour"], &["lupin"]),
            &profile(&["lupin"]),
            &catalog(),
        );
        assert_eq!(result.safety_status, SafetyStatus::Unsafe);
        assert_eq!(result.direct_matches, vec!["lupin"]);
        assert!(result.potential_matches.is_empty());
        assert!(result.matched_allergens.is_empty());
    }

    #[test]
    fn empty_catalog_only_direct_matches() {
        let result = analyze(&product(&["Butter"], &["milk"]), &profile(&["milk"]), &[]);
        assert_eq!(result.safety_status, SafetyStatus::Unsafe);
        assert!(result.potential_matches.is_empty());
        assert!(result.matched_allergens.is_empty());
    }

    #[test]
    fn no_evidence_is_safe() {
        let result = analyze(&product(&["Water", "Salt"], &["soy"]), &profile(&["milk"]), &catalog());
        assert_eq!(result.safety_status, SafetyStatus::Safe);
        assert!(result.direct_matches.is_empty());
        assert!(result.potential_matches.is_empty());
    }

    #[test]
    fn severity_does_not_affect_status() {
        let mut low = catalog();
        let mut high = catalog();
        for record in &mut low {
            record.severity = Severity::Low;
        }
        for record in &mut high {
            record.severity = Severity::High;
        }
        let p = product(&["Cream"], &[]);
        let prof = profile(&["milk"]);
        assert_eq!(
            analyze(&p, &prof, &low).safety_status,
            analyze(&p, &prof, &high).safety_status
        );
    }

    #[test]
    fn empty_alias_matches_any_ingredient() {
        let catalog = vec![allergen("odd", "Odd", &[""])];
        let result = analyze(&product(&["Water"], &[]), &profile(&["odd"]), &catalog);
        assert_eq!(result.safety_status, SafetyStatus::Caution);
        assert_eq!(result.potential_matches, vec![""]);
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = analyze(&product(&["Butter"], &[]), &profile(&["milk"]), &catalog());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["safetyStatus"], "caution");
        assert_eq!(json["potentialMatches"][0], "butter");
        assert!(json["directMatches"].as_array().unwrap().is_empty());
        assert!(json["matchedAllergens"].as_array().unwrap().is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const IDS: &[&str] = &["peanuts", "milk", "eggs", "lupin"];

        fn id_set() -> impl Strategy<Value = Vec<String>> {
            proptest::sample::subsequence(IDS, 0..=IDS.len())
                .prop_map(|ids| ids.into_iter().map(str::to_owned).collect())
        }

        fn ingredients() -> impl Strategy<Value = Vec<String>> {
            proptest::collection::vec("[a-zA-Z ()]{0,24}", 0..8)
        }

        fn build_product(ingredients: Vec<String>, warnings: Vec<String>) -> ProductRecord {
            ProductRecord {
                id: "p".to_owned(),
                name: "Generated".to_owned(),
                brand: "Brand".to_owned(),
                barcode: "1".to_owned(),
                ingredients,
                allergen_warnings: warnings,
                image: None,
            }
        }

        proptest! {
            #[test]
            fn empty_profile_always_safe(
                ingredients in ingredients(),
                warnings in id_set(),
            ) {
                let result = analyze(
                    &build_product(ingredients, warnings),
                    &UserProfile::default(),
                    &catalog(),
                );
                prop_assert_eq!(result.safety_status, SafetyStatus::Safe);
                prop_assert!(result.direct_matches.is_empty());
                prop_assert!(result.potential_matches.is_empty());
            }

            #[test]
            fn any_declared_allergen_is_unsafe_in_profile_order(
                ingredients in ingredients(),
                warnings in id_set(),
                allergens in id_set(),
            ) {
                let expected: Vec<String> = allergens
                    .iter()
                    .filter(|id| warnings.contains(id))
                    .cloned()
                    .collect();
                let result = analyze(
                    &build_product(ingredients, warnings),
                    &UserProfile { allergens, ..UserProfile::default() },
                    &catalog(),
                );
                if expected.is_empty() {
                    prop_assert_ne!(result.safety_status, SafetyStatus::Unsafe);
                } else {
                    prop_assert_eq!(result.safety_status, SafetyStatus::Unsafe);
                }
                prop_assert_eq!(result.direct_matches, expected);
            }

            #[test]
            fn match_lists_never_contain_duplicates(
                ingredients in ingredients(),
                warnings in id_set(),
                allergens in id_set(),
            ) {
                let result = analyze(
                    &build_product(ingredients, warnings),
                    &UserProfile { allergens, ..UserProfile::default() },
                    &catalog(),
                );
                let mut direct = result.direct_matches.clone();
                direct.sort();
                direct.dedup();
                prop_assert_eq!(direct.len(), result.direct_matches.len());

                let mut potential = result.potential_matches.clone();
                potential.sort();
                potential.dedup();
                prop_assert_eq!(potential.len(), result.potential_matches.len());
            }

            #[test]
            fn phrase_found_without_direct_match_is_caution(
                prefix in "[a-z ]{0,8}",
                suffix in "[a-z ]{0,8}",
            ) {
                let ingredient = format!("{prefix}WHEY{suffix}");
                let result = analyze(
                    &build_product(vec![ingredient.clone(), ingredient], vec![]),
                    &UserProfile { allergens: vec!["milk".to_owned()], ..UserProfile::default() },
                    &catalog(),
                );
                prop_assert_eq!(result.safety_status, SafetyStatus::Caution);
                prop_assert_eq!(
                    result.potential_matches.iter().filter(|p| p.as_str() == "whey").count(),
                    1
                );
            }

            #[test]
            fn analyze_is_deterministic(
                ingredients in ingredients(),
                warnings in id_set(),
                allergens in id_set(),
            ) {
                let product = build_product(ingredients, warnings);
                let profile = UserProfile { allergens, ..UserProfile::default() };
                let catalog = catalog();
                prop_assert_eq!(
                    analyze(&product, &profile, &catalog),
                    analyze(&product, &profile, &catalog)
                );
            }
        }
    }
}
