//! 알레르겐 카탈로그 -- 읽기 전용 알레르겐 참조 테이블
//!
//! [`AllergenCatalog`]는 알레르겐 id를 표시명, 설명, 별칭, 심각도에 매핑합니다.
//! 한 번 로드된 뒤 프로세스 수명 동안 변경되지 않으며 `Arc`로 공유됩니다.
//!
//! # JSON 형식
//!
//! ```json
//! [
//!   {
//!     "id": "milk",
//!     "name": "Milk",
//!     "description": "Dairy products including milk, cheese, butter, and yogurt",
//!     "aliases": ["dairy", "lactose", "whey", "casein", "cream", "cheese", "butter"],
//!     "severity": "medium"
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use canieat_core::types::AllergenRecord;

use crate::dataset;
use crate::error::AllergenScannerError;

const BUILTIN_ALLERGENS: &str = include_str!("../data/allergens.json");

/// 알레르겐 카탈로그
///
/// 레코드는 데이터셋 순서를 유지합니다. `records()`가 돌려주는 슬라이스가
/// 안전 판정의 `catalog` 인자입니다.
///
/// # 인덱싱
///
/// O(1) 조회를 위해 id로 인덱싱된 HashMap을 사용합니다.
#[derive(Debug, Clone)]
pub struct AllergenCatalog {
    /// 데이터셋 순서의 레코드
    records: Vec<AllergenRecord>,
    /// id -> records 인덱스
    index: HashMap<String, usize>,
}

impl AllergenCatalog {
    /// 빈 카탈로그를 생성합니다.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// 레코드 목록으로 카탈로그를 생성합니다.
    ///
    /// id가 중복되면 `DuplicateId` 에러를 반환합니다.
    pub fn from_records(records: Vec<AllergenRecord>) -> Result<Self, AllergenScannerError> {
        let mut index = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), idx).is_some() {
                return Err(AllergenScannerError::DuplicateId {
                    dataset: "allergen".to_owned(),
                    id: record.id.clone(),
                });
            }
        }
        Ok(Self { records, index })
    }

    /// JSON 문자열에서 카탈로그를 파싱합니다.
    pub fn from_json(json: &str) -> Result<Self, AllergenScannerError> {
        Self::from_records(dataset::parse_records("allergen", json)?)
    }

    /// 내장 알레르겐 데이터셋 (11종)을 로드합니다.
    pub fn builtin() -> Result<Self, AllergenScannerError> {
        Self::from_json(BUILTIN_ALLERGENS)
    }

    /// 파일에서 카탈로그를 로드합니다. 파일이 없으면 `Ok(None)`.
    ///
    /// # Note
    ///
    /// 동기 I/O를 수행합니다.
    pub fn load_from_file(
        path: &Path,
        max_file_size: u64,
    ) -> Result<Option<Self>, AllergenScannerError> {
        match dataset::read_dataset_file(path, max_file_size)? {
            Some(content) => {
                let catalog = Self::from_json(&content)?;
                tracing::info!(
                    path = %path.display(),
                    allergens = catalog.len(),
                    "allergen catalog loaded"
                );
                Ok(Some(catalog))
            }
            None => Ok(None),
        }
    }

    /// id로 알레르겐을 조회합니다.
    pub fn get(&self, id: &str) -> Option<&AllergenRecord> {
        self.index.get(id).map(|&idx| &self.records[idx])
    }

    /// id가 카탈로그에 있는지 확인합니다.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// 표시명을 반환합니다. 카탈로그에 없는 id는 그대로 반환합니다.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |record| record.name.as_str())
    }

    /// 데이터셋 순서의 전체 레코드를 반환합니다.
    pub fn records(&self) -> &[AllergenRecord] {
        &self.records
    }

    /// 레코드 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 카탈로그가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
