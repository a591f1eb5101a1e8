//! 도메인 타입 -- 제품, 사용자 프로필, 증상 가이드
//!
//! 필드명은 저장/데이터셋 JSON 형식에 맞춰 camelCase로 직렬화됩니다
//! (`allergenWarnings`, `dietaryRestrictions`, `emergencyContact` 등).

use std::fmt;

use serde::{Deserialize, Serialize};

/// 포장 식품 레코드
///
/// 생성 이후 변경되지 않는 정적 참조 데이터입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// 제품 ID (예: `prod001`)
    pub id: String,
    /// 제품명
    pub name: String,
    /// 브랜드
    pub brand: String,
    /// 바코드 (조회 키)
    pub barcode: String,
    /// 성분 목록 (자유 텍스트, 괄호 안 하위 성분 포함 가능)
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// 제품이 명시적으로 선언한 알레르겐 id 목록
    #[serde(default)]
    pub allergen_warnings: Vec<String>,
    /// 이미지 참조 (표시용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl fmt::Display for ProductRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.brand, self.name, self.barcode)
    }
}

/// 사용자 알레르겐 프로필
///
/// `allergens`는 중복 없는 카탈로그 id 집합입니다. 이미 있는 id를 추가하는 것은
/// no-op입니다. 스냅샷 헬퍼는 모두 새 값을 반환하며 `self`를 변경하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// 선택한 알레르겐 id 목록
    #[serde(default)]
    pub allergens: Vec<String>,
    /// 식이 제한 (분석에는 사용되지 않음)
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 비상 연락처
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

impl UserProfile {
    /// 해당 알레르겐이 선택되어 있는지 확인합니다.
    pub fn has_allergen(&self, id: &str) -> bool {
        self.allergens.iter().any(|a| a == id)
    }

    /// 알레르겐을 추가한 스냅샷을 반환합니다. 이미 있으면 그대로 복제합니다.
    pub fn with_allergen(&self, id: &str) -> Self {
        let mut next = self.clone();
        if !next.has_allergen(id) {
            next.allergens.push(id.to_owned());
        }
        next
    }

    /// 알레르겐을 제거한 스냅샷을 반환합니다.
    pub fn without_allergen(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.allergens.retain(|a| a != id);
        next
    }

    /// 식이 제한을 추가한 스냅샷을 반환합니다. 이미 있으면 그대로 복제합니다.
    pub fn with_dietary_restriction(&self, restriction: &str) -> Self {
        let mut next = self.clone();
        if !next.dietary_restrictions.iter().any(|r| r == restriction) {
            next.dietary_restrictions.push(restriction.to_owned());
        }
        next
    }

    /// 식이 제한을 제거한 스냅샷을 반환합니다.
    pub fn without_dietary_restriction(&self, restriction: &str) -> Self {
        let mut next = self.clone();
        next.dietary_restrictions.retain(|r| r != restriction);
        next
    }

    /// 알레르겐과 식이 제한을 비운 스냅샷을 반환합니다.
    ///
    /// 이름과 비상 연락처는 유지됩니다.
    pub fn cleared(&self) -> Self {
        Self {
            allergens: Vec::new(),
            dietary_restrictions: Vec::new(),
            name: self.name.clone(),
            emergency_contact: self.emergency_contact.clone(),
        }
    }

    /// 부분 업데이트를 적용한 스냅샷을 반환합니다.
    pub fn merged(&self, update: ProfileUpdate) -> Self {
        let mut next = self.clone();
        if let Some(allergens) = update.allergens {
            next.allergens = dedup_preserving_order(allergens);
        }
        if let Some(restrictions) = update.dietary_restrictions {
            next.dietary_restrictions = dedup_preserving_order(restrictions);
        }
        if let Some(name) = update.name {
            next.name = non_empty(name);
        }
        if let Some(contact) = update.emergency_contact {
            next.emergency_contact = non_empty(contact);
        }
        next
    }

    /// 외부에서 읽어온 레코드의 중복 항목을 제거합니다 (첫 등장 순서 유지).
    pub fn normalized(mut self) -> Self {
        self.allergens = dedup_preserving_order(self.allergens);
        self.dietary_restrictions = dedup_preserving_order(self.dietary_restrictions);
        self
    }
}

/// 프로필 부분 업데이트
///
/// `None` 필드는 유지됩니다. `name`/`emergency_contact`에 빈 문자열을 주면 값이 지워집니다.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// 알레르겐 목록 전체 교체
    pub allergens: Option<Vec<String>>,
    /// 식이 제한 목록 전체 교체
    pub dietary_restrictions: Option<Vec<String>>,
    /// 이름
    pub name: Option<String>,
    /// 비상 연락처
    pub emergency_contact: Option<String>,
}

/// 알레르겐별 증상/응급처치 가이드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomGuide {
    /// 알레르겐 id
    pub allergen_id: String,
    /// 알레르겐 표시명
    pub allergen_name: String,
    /// 증상
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// 응급처치
    #[serde(default)]
    pub first_aid: Vec<String>,
    /// 의료 도움이 필요한 경우
    #[serde(default)]
    pub when_to_seek_help: Vec<String>,
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
