//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 알레르겐 카탈로그 레코드와 심각도, 안전 판정 등 모든 크레이트가
//! 공유하는 데이터 구조를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 알레르겐 심각도
///
/// 표시용 정보일 뿐이며 안전 판정 알고리즘에는 영향을 주지 않습니다.
/// `Ord` 구현으로 비교가 가능합니다 (`Low < Medium < High`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 낮은 심각도
    Low,
    /// 중간 심각도
    #[default]
    Medium,
    /// 높은 심각도 (아나필락시스 위험)
    High,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// 제품 안전 판정
///
/// 우선순위: `Unsafe` (직접 매칭) > `Caution` (성분 텍스트 매칭) > `Safe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyStatus {
    /// 사용자 알레르겐과 관련된 근거 없음
    Safe,
    /// 성분 텍스트에서 잠재적 매칭 발견
    Caution,
    /// 제품이 사용자 알레르겐을 명시적으로 선언
    Unsafe,
}

impl SafetyStatus {
    /// 배지에 표시할 문구를 반환합니다.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "Safe to Eat",
            Self::Caution => "Use Caution",
            Self::Unsafe => "Not Safe",
        }
    }

    /// 경고 카드 제목을 반환합니다.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Safe => "Safe for You",
            Self::Caution => "May Contain Allergens",
            Self::Unsafe => "Contains Your Allergens",
        }
    }

    /// 경고 카드 본문을 반환합니다.
    ///
    /// `matched_names`는 `Unsafe`일 때만 사용되며 직접 매칭된 알레르겐 표시명입니다.
    pub fn advice(&self, matched_names: &[String]) -> String {
        match self {
            Self::Safe => "Based on your profile, this product doesn't contain any of your \
                           listed allergens."
                .to_owned(),
            Self::Caution => "This product may contain ingredients related to your allergens. \
                              Please check the ingredient list carefully."
                .to_owned(),
            Self::Unsafe => format!(
                "This product contains {}, which you've listed as allergens.",
                matched_names.join(", ")
            ),
        }
    }
}

impl fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Caution => write!(f, "caution"),
            Self::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// 알레르겐 카탈로그 레코드
///
/// `id`는 카탈로그 내에서 유일한 기본 키입니다.
/// `aliases`는 텍스트 매칭에만 사용되며 식별에는 쓰이지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenRecord {
    /// 안정적인 식별자 (예: `tree_nuts`)
    pub id: String,
    /// 표시명
    pub name: String,
    /// 설명
    pub description: String,
    /// 별칭/동의어 목록 (순서 유지)
    #[serde(default)]
    pub aliases: Vec<String>,
    /// 심각도 (표시용)
    pub severity: Severity,
}

impl AllergenRecord {
    /// 텍스트 매칭에 사용할 소문자 후보 문구를 반환합니다.
    ///
    /// 이름이 먼저, 그 뒤로 별칭이 선언 순서대로 나옵니다.
    pub fn match_phrases(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.name.to_lowercase())
            .chain(self.aliases.iter().map(|alias| alias.to_lowercase()))
    }
}

impl fmt::Display for AllergenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, severity={})", self.name, self.id, self.severity)
    }
}
