//! 알레르겐 스캐너 오케스트레이터 -- 바코드에서 판정까지의 흐름 관리
//!
//! [`AllergenScanner`]는 세 참조 데이터셋(알레르겐, 제품, 증상)을 `Arc`로 보유하고
//! 바코드 조회와 안전 판정을 연결합니다. 로그와 메트릭은 여기서 기록하며
//! [`analyze`](crate::analyzer::analyze)는 순수하게 유지됩니다.
//!
//! # 내부 아키텍처
//!
//! ```text
//! barcode --> ProductTable::find_by_barcode --+--> NotFound { code }
//!                                             |
//!                                             v
//!              UserProfile + AllergenCatalog --> analyze --> Found { product, analysis }
//! ```

use std::path::Path;
use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, warn};

use canieat_core::metrics as m;

use crate::analyzer::{AnalysisResult, analyze};
use crate::catalog::AllergenCatalog;
use crate::config::AllergenScannerConfig;
use crate::dataset::{ALLERGENS_FILE, PRODUCTS_FILE, SYMPTOMS_FILE};
use crate::error::AllergenScannerError;
use crate::products::ProductTable;
use crate::symptoms::SymptomCatalog;
use crate::types::{ProductRecord, UserProfile};

/// 바코드 스캔 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// 제품을 찾아 판정함
    Found {
        /// 조회된 제품
        product: ProductRecord,
        /// 안전 판정 결과
        analysis: AnalysisResult,
    },
    /// 제품 테이블에 없는 바코드
    NotFound {
        /// 조회한 바코드
        code: String,
    },
}

impl ScanOutcome {
    /// 제품을 찾았는지 확인합니다.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// 판정 결과를 반환합니다 (제품 없음이면 `None`).
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Found { analysis, .. } => Some(analysis),
            Self::NotFound { .. } => None,
        }
    }
}

/// 알레르겐 스캐너
///
/// 데이터셋은 불변이며 `Arc`로 공유되므로 `Clone`이 저렴합니다.
#[derive(Debug, Clone)]
pub struct AllergenScanner {
    catalog: Arc<AllergenCatalog>,
    products: Arc<ProductTable>,
    symptoms: Arc<SymptomCatalog>,
}

impl AllergenScanner {
    /// 내장 데이터셋으로 스캐너를 생성합니다.
    pub fn builtin() -> Result<Self, AllergenScannerError> {
        AllergenScannerBuilder::new().build()
    }

    /// 설정에 따라 데이터셋을 로드하여 스캐너를 생성합니다.
    ///
    /// 파일 I/O는 `spawn_blocking`에서 수행합니다.
    pub async fn load(config: AllergenScannerConfig) -> Result<Self, AllergenScannerError> {
        config.validate()?;
        let scanner = tokio::task::spawn_blocking(move || {
            AllergenScannerBuilder::new().config(config).build()
        })
        .await
        .map_err(|e| AllergenScannerError::DatasetLoad {
            path: "<datasets>".to_owned(),
            reason: format!("spawn_blocking failed: {e}"),
        })??;
        Ok(scanner)
    }

    /// 알레르겐 카탈로그를 반환합니다.
    pub fn catalog(&self) -> &AllergenCatalog {
        &self.catalog
    }

    /// 제품 테이블을 반환합니다.
    pub fn products(&self) -> &ProductTable {
        &self.products
    }

    /// 증상 카탈로그를 반환합니다.
    pub fn symptoms(&self) -> &SymptomCatalog {
        &self.symptoms
    }

    /// 바코드로 제품을 찾아 사용자 프로필과 대조합니다.
    pub fn check_barcode(&self, code: &str, profile: &UserProfile) -> ScanOutcome {
        match self.products.find_by_barcode(code) {
            Some(product) => {
                counter!(m::SCANS_TOTAL, m::LABEL_RESULT => "found").increment(1);
                debug!(barcode = code, product_id = %product.id, "product found");
                ScanOutcome::Found {
                    product: product.clone(),
                    analysis: self.analyze_product(product, profile),
                }
            }
            None => {
                counter!(m::SCANS_TOTAL, m::LABEL_RESULT => "not_found").increment(1);
                info!(barcode = code, "product not found");
                ScanOutcome::NotFound {
                    code: code.to_owned(),
                }
            }
        }
    }

    /// 제품 id로 판정합니다. 테이블에 없는 id면 `None`.
    pub fn check_product(&self, id: &str, profile: &UserProfile) -> Option<AnalysisResult> {
        self.products
            .find_by_id(id)
            .map(|product| self.analyze_product(product, profile))
    }

    /// 프로필의 알레르겐 중 카탈로그에 없는 id를 반환합니다.
    pub fn unknown_allergens<'a>(&self, profile: &'a UserProfile) -> Vec<&'a str> {
        profile
            .allergens
            .iter()
            .filter(|id| !self.catalog.contains(id))
            .map(String::as_str)
            .collect()
    }

    fn analyze_product(&self, product: &ProductRecord, profile: &UserProfile) -> AnalysisResult {
        let analysis = analyze(product, profile, self.catalog.records());
        counter!(
            m::ANALYSIS_VERDICTS_TOTAL,
            m::LABEL_STATUS => analysis.safety_status.to_string()
        )
        .increment(1);
        debug!(
            product_id = %product.id,
            status = %analysis.safety_status,
            direct = analysis.direct_matches.len(),
            potential = analysis.potential_matches.len(),
            "product analyzed"
        );
        analysis
    }
}

/// 알레르겐 스캐너 빌더
///
/// 데이터셋을 직접 주입하거나 설정의 `dataset_dir`에서 읽습니다.
/// 주입하지도 않고 디렉토리에도 없는 데이터셋은 내장 데이터로 채웁니다.
#[derive(Default)]
pub struct AllergenScannerBuilder {
    config: AllergenScannerConfig,
    catalog: Option<AllergenCatalog>,
    products: Option<ProductTable>,
    symptoms: Option<SymptomCatalog>,
}

impl AllergenScannerBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 스캐너 설정을 지정합니다.
    pub fn config(mut self, config: AllergenScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// 알레르겐 카탈로그를 주입합니다.
    pub fn catalog(mut self, catalog: AllergenCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 제품 테이블을 주입합니다.
    pub fn products(mut self, products: ProductTable) -> Self {
        self.products = Some(products);
        self
    }

    /// 증상 카탈로그를 주입합니다.
    pub fn symptoms(mut self, symptoms: SymptomCatalog) -> Self {
        self.symptoms = Some(symptoms);
        self
    }

    /// 스캐너를 빌드합니다.
    ///
    /// # Note
    ///
    /// `dataset_dir`이 설정되어 있으면 동기 I/O를 수행합니다.
    /// async 컨텍스트에서는 [`AllergenScanner::load`]를 사용하세요.
    pub fn build(self) -> Result<AllergenScanner, AllergenScannerError> {
        self.config.validate()?;

        let dir = self.config.dataset_path();
        let max = self.config.max_file_size;

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => load_or_builtin(
                dir.as_deref(),
                ALLERGENS_FILE,
                max,
                AllergenCatalog::load_from_file,
                AllergenCatalog::builtin,
            )?,
        };

        let products = match self.products {
            Some(products) => products,
            None => load_or_builtin(
                dir.as_deref(),
                PRODUCTS_FILE,
                max,
                ProductTable::load_from_file,
                ProductTable::builtin,
            )?,
        };

        let symptoms = match self.symptoms {
            Some(symptoms) => symptoms,
            None => load_or_builtin(
                dir.as_deref(),
                SYMPTOMS_FILE,
                max,
                SymptomCatalog::load_from_file,
                SymptomCatalog::builtin,
            )?,
        };

        warn_unknown_references(&catalog, &products, &symptoms);

        info!(
            allergens = catalog.len(),
            products = products.len(),
            symptom_guides = symptoms.len(),
            "allergen scanner ready"
        );

        Ok(AllergenScanner {
            catalog: Arc::new(catalog),
            products: Arc::new(products),
            symptoms: Arc::new(symptoms),
        })
    }
}

/// 데이터셋 디렉토리에 파일이 있으면 읽고, 없으면 내장 데이터를 사용합니다.
fn load_or_builtin<T>(
    dir: Option<&Path>,
    file: &str,
    max_file_size: u64,
    load: impl FnOnce(&Path, u64) -> Result<Option<T>, AllergenScannerError>,
    builtin: impl FnOnce() -> Result<T, AllergenScannerError>,
) -> Result<T, AllergenScannerError> {
    if let Some(dir) = dir {
        let path = dir.join(file);
        if let Some(loaded) = load(&path, max_file_size)? {
            return Ok(loaded);
        }
        debug!(path = %path.display(), "dataset file absent, using built-in data");
    }
    builtin()
}

/// 카탈로그에 없는 알레르겐 id를 참조하는 제품 경고와 증상 가이드를 로그로 남깁니다.
fn warn_unknown_references(
    catalog: &AllergenCatalog,
    products: &ProductTable,
    symptoms: &SymptomCatalog,
) {
    for product in products.records() {
        for id in &product.allergen_warnings {
            if !catalog.contains(id) {
                warn!(
                    product_id = %product.id,
                    allergen_id = %id,
                    "product warning references unknown allergen"
                );
            }
        }
    }
    for guide in symptoms.records() {
        if !catalog.contains(&guide.allergen_id) {
            warn!(
                allergen_id = %guide.allergen_id,
                "symptom guide references unknown allergen"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canieat_core::types::SafetyStatus;

    fn profile(allergens: &[&str]) -> UserProfile {
        UserProfile {
            allergens: allergens.iter().map(|s| (*s).to_owned()).collect(),
            ..UserProfile::default()
        }
    }

    #[test]
    fn builtin_scanner_loads_all_datasets() {
        let scanner = AllergenScanner::builtin().unwrap();
        assert_eq!(scanner.catalog().len(), 11);
        assert_eq!(scanner.products().len(), 10);
        assert_eq!(scanner.symptoms().len(), 11);
    }

    #[test]
    fn check_barcode_found() {
        let scanner = AllergenScanner::builtin().unwrap();
        let outcome = scanner.check_barcode("2345678901234", &profile(&["peanuts"]));
        match outcome {
            ScanOutcome::Found { product, analysis } => {
                assert_eq!(product.id, "prod002");
                assert_eq!(analysis.safety_status, SafetyStatus::Unsafe);
                assert_eq!(analysis.direct_matches, vec!["peanuts"]);
            }
            ScanOutcome::NotFound { .. } => panic!("expected product"),
        }
    }

    #[test]
    fn check_barcode_not_found() {
        let scanner = AllergenScanner::builtin().unwrap();
        let outcome = scanner.check_barcode("0000000000000", &profile(&["milk"]));
        assert_eq!(
            outcome,
            ScanOutcome::NotFound {
                code: "0000000000000".to_owned()
            }
        );
        assert!(!outcome.is_found());
        assert!(outcome.analysis().is_none());
    }

    #[test]
    fn check_product_by_id() {
        let scanner = AllergenScanner::builtin().unwrap();
        let analysis = scanner.check_product("prod001", &profile(&["shellfish"])).unwrap();
        assert!(analysis.is_safe());
        assert!(scanner.check_product("missing", &profile(&[])).is_none());
    }

    #[test]
    fn unknown_allergens_are_reported() {
        let scanner = AllergenScanner::builtin().unwrap();
        let p = profile(&["milk", "lupin"]);
        assert_eq!(scanner.unknown_allergens(&p), vec!["lupin"]);
    }

    #[test]
    fn builder_uses_injected_datasets() {
        let products = ProductTable::from_json(
            r#"[{"id":"x1","name":"Oat Bar","brand":"Acme","barcode":"42","ingredients":["Oats","Whey"],"allergenWarnings":[]}]"#,
        )
        .unwrap();
        let scanner = AllergenScannerBuilder::new()
            .products(products)
            .symptoms(SymptomCatalog::empty())
            .build()
            .unwrap();
        assert_eq!(scanner.products().len(), 1);
        assert!(scanner.symptoms().is_empty());

        let analysis = scanner
            .check_barcode("42", &profile(&["milk"]))
            .analysis()
            .cloned()
            .unwrap();
        assert_eq!(analysis.safety_status, SafetyStatus::Caution);
        assert_eq!(analysis.potential_matches, vec!["whey"]);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = AllergenScannerBuilder::new()
            .config(AllergenScannerConfig {
                max_file_size: 0,
                ..Default::default()
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn scan_outcome_serializes_with_tag() {
        let outcome = ScanOutcome::NotFound {
            code: "123".to_owned(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "not_found");
        assert_eq!(json["code"], "123");
    }

    #[tokio::test]
    async fn load_with_partial_dataset_dir_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PRODUCTS_FILE),
            r#"[{"id":"c1","name":"Custom","brand":"B","barcode":"999","ingredients":[],"allergenWarnings":["soy"]}]"#,
        )
        .unwrap();

        let config = AllergenScannerConfig {
            dataset_dir: dir.path().display().to_string(),
            ..Default::default()
        };
        let scanner = AllergenScanner::load(config).await.unwrap();
        assert_eq!(scanner.products().len(), 1);
        assert_eq!(scanner.catalog().len(), 11);
        assert_eq!(scanner.symptoms().len(), 11);
    }

    #[tokio::test]
    async fn load_reports_corrupt_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ALLERGENS_FILE), "not json").unwrap();

        let config = AllergenScannerConfig {
            dataset_dir: dir.path().display().to_string(),
            ..Default::default()
        };
        let err = AllergenScanner::load(config).await.unwrap_err();
        assert!(matches!(err, AllergenScannerError::DatasetParse { .. }));
    }
}
