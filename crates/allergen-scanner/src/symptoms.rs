//! 증상 가이드 카탈로그
//!
//! 알레르겐 id별 증상, 응급처치, 의료 도움이 필요한 경우를 담은 읽기 전용 테이블입니다.
//! 표시 계층에서만 사용하며 안전 판정에는 쓰이지 않습니다.

use std::collections::HashMap;
use std::path::Path;

use crate::dataset;
use crate::error::AllergenScannerError;
use crate::types::SymptomGuide;

const BUILTIN_SYMPTOMS: &str = include_str!("../data/symptoms.json");

/// 증상 가이드 카탈로그
#[derive(Debug, Clone)]
pub struct SymptomCatalog {
    guides: Vec<SymptomGuide>,
    index: HashMap<String, usize>,
}

impl SymptomCatalog {
    /// 빈 카탈로그를 생성합니다.
    pub fn empty() -> Self {
        Self {
            guides: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// 가이드 목록으로 카탈로그를 생성합니다. 알레르겐 id당 하나만 허용됩니다.
    pub fn from_records(guides: Vec<SymptomGuide>) -> Result<Self, AllergenScannerError> {
        let mut index = HashMap::with_capacity(guides.len());
        for (idx, guide) in guides.iter().enumerate() {
            if index.insert(guide.allergen_id.clone(), idx).is_some() {
                return Err(AllergenScannerError::DuplicateId {
                    dataset: "symptom".to_owned(),
                    id: guide.allergen_id.clone(),
                });
            }
        }
        Ok(Self { guides, index })
    }

    /// JSON 문자열에서 카탈로그를 파싱합니다.
    pub fn from_json(json: &str) -> Result<Self, AllergenScannerError> {
        Self::from_records(dataset::parse_records("symptom", json)?)
    }

    /// 내장 증상 데이터셋을 로드합니다.
    pub fn builtin() -> Result<Self, AllergenScannerError> {
        Self::from_json(BUILTIN_SYMPTOMS)
    }

    /// 파일에서 카탈로그를 로드합니다. 파일이 없으면 `Ok(None)`.
    pub fn load_from_file(
        path: &Path,
        max_file_size: u64,
    ) -> Result<Option<Self>, AllergenScannerError> {
        match dataset::read_dataset_file(path, max_file_size)? {
            Some(content) => Self::from_json(&content).map(Some),
            None => Ok(None),
        }
    }

    /// 알레르겐 id로 가이드를 조회합니다.
    pub fn get(&self, allergen_id: &str) -> Option<&SymptomGuide> {
        self.index.get(allergen_id).map(|&idx| &self.guides[idx])
    }

    /// 전체 가이드를 반환합니다.
    pub fn records(&self) -> &[SymptomGuide] {
        &self.guides
    }

    /// 가이드 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.guides.len()
    }

    /// 카탈로그가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }
}
