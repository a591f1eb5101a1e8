//! 제품 테이블 -- 바코드로 제품 레코드 조회
//!
//! 조회는 정확한 문자열 일치입니다. 대소문자 변환, 선행 0 제거, 체크섬 검증 같은
//! 정규화는 하지 않습니다. 스캐닝 쪽이 저장된 형식 그대로 코드를 넘겨야 합니다.

use std::collections::HashMap;
use std::path::Path;

use crate::dataset;
use crate::error::AllergenScannerError;
use crate::types::ProductRecord;

const BUILTIN_PRODUCTS: &str = include_str!("../data/products.json");

/// 바코드로 제품을 찾습니다.
///
/// 테이블 순서상 첫 번째 일치 항목을 반환합니다. 바코드가 중복된 (잘못된) 테이블에서도
/// 첫 번째 항목이 선택됩니다.
pub fn find_by_barcode<'a>(code: &str, products: &'a [ProductRecord]) -> Option<&'a ProductRecord> {
    products.iter().find(|product| product.barcode == code)
}

/// 제품 테이블
///
/// 제품 id는 유일해야 합니다. 바코드 중복은 허용되며 첫 번째 항목이 조회됩니다.
#[derive(Debug, Clone)]
pub struct ProductTable {
    /// 테이블 순서의 제품 목록
    products: Vec<ProductRecord>,
    /// id -> products 인덱스
    id_index: HashMap<String, usize>,
}

impl ProductTable {
    /// 빈 테이블을 생성합니다.
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
            id_index: HashMap::new(),
        }
    }

    /// 레코드 목록으로 테이블을 생성합니다.
    pub fn from_records(products: Vec<ProductRecord>) -> Result<Self, AllergenScannerError> {
        let mut id_index = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            if id_index.insert(product.id.clone(), idx).is_some() {
                return Err(AllergenScannerError::DuplicateId {
                    dataset: "product".to_owned(),
                    id: product.id.clone(),
                });
            }
        }

        let table = Self { products, id_index };
        let duplicates = table.duplicate_barcodes();
        if !duplicates.is_empty() {
            tracing::warn!(
                barcodes = ?duplicates,
                "product table contains duplicate barcodes, first occurrence wins"
            );
        }
        Ok(table)
    }

    /// JSON 문자열에서 테이블을 파싱합니다.
    pub fn from_json(json: &str) -> Result<Self, AllergenScannerError> {
        Self::from_records(dataset::parse_records("product", json)?)
    }

    /// 내장 제품 데이터셋 (`prod001`..`prod010`)을 로드합니다.
    pub fn builtin() -> Result<Self, AllergenScannerError> {
        Self::from_json(BUILTIN_PRODUCTS)
    }

    /// 파일에서 테이블을 로드합니다. 파일이 없으면 `Ok(None)`.
    pub fn load_from_file(
        path: &Path,
        max_file_size: u64,
    ) -> Result<Option<Self>, AllergenScannerError> {
        match dataset::read_dataset_file(path, max_file_size)? {
            Some(content) => {
                let table = Self::from_json(&content)?;
                tracing::info!(
                    path = %path.display(),
                    products = table.len(),
                    "product table loaded"
                );
                Ok(Some(table))
            }
            None => Ok(None),
        }
    }

    /// 바코드로 제품을 조회합니다.
    pub fn find_by_barcode(&self, code: &str) -> Option<&ProductRecord> {
        find_by_barcode(code, &self.products)
    }

    /// 제품 id로 조회합니다.
    pub fn find_by_id(&self, id: &str) -> Option<&ProductRecord> {
        self.id_index.get(id).map(|&idx| &self.products[idx])
    }

    /// 테이블 순서의 전체 제품을 반환합니다.
    pub fn records(&self) -> &[ProductRecord] {
        &self.products
    }

    /// 제품 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// 테이블이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn duplicate_barcodes(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for product in &self.products {
            if !seen.insert(product.barcode.as_str()) {
                duplicates.push(product.barcode.as_str());
            }
        }
        duplicates
    }
}
