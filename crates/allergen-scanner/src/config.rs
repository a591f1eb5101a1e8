//! 알레르겐 스캐너 설정
//!
//! [`AllergenScannerConfig`]는 core의 [`CatalogConfig`](canieat_core::config::CatalogConfig)에서
//! 파생되며, 참조 데이터셋을 어디서 읽을지와 파일 크기 제한을 담습니다.
//!
//! # 사용 예시
//!
//! ```
//! use canieat_allergen_scanner::AllergenScannerConfig;
//!
//! // 기본값: 내장 데이터셋 사용
//! let config = AllergenScannerConfig::default();
//! config.validate().unwrap();
//! assert!(config.uses_builtin_datasets());
//!
//! use canieat_allergen_scanner::AllergenScannerConfigBuilder;
//!
//! let config = AllergenScannerConfigBuilder::new()
//!     .dataset_dir("/opt/canieat/datasets")
//!     .max_file_size(512 * 1024)
//!     .build()
//!     .unwrap();
//! assert!(!config.uses_builtin_datasets());
//! ```

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use canieat_core::config::MAX_DATASET_FILE_SIZE;

use crate::error::AllergenScannerError;

/// 경로 최대 길이
const MAX_PATH_LEN: usize = 4096;

/// 알레르겐 스캐너 설정
///
/// # 필드
///
/// - **dataset_dir**: 데이터셋 디렉토리 (비어 있으면 내장 데이터셋)
/// - **max_file_size**: 데이터셋 파일 최대 크기 (바이트)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenScannerConfig {
    /// 데이터셋 디렉토리
    ///
    /// 디렉토리에 없는 파일은 해당 내장 데이터셋으로 대체됩니다.
    pub dataset_dir: String,
    /// 데이터셋 파일 최대 크기 (바이트)
    pub max_file_size: u64,
}

impl Default for AllergenScannerConfig {
    fn default() -> Self {
        Self {
            dataset_dir: String::new(),
            max_file_size: 1024 * 1024, // 1MB
        }
    }
}

impl AllergenScannerConfig {
    /// core의 `CatalogConfig`에서 스캐너 설정을 생성합니다.
    pub fn from_core(core: &canieat_core::config::CatalogConfig) -> Self {
        Self {
            dataset_dir: core.dataset_dir.clone(),
            max_file_size: core.max_file_size,
        }
    }

    /// 내장 데이터셋만 사용하는지 확인합니다.
    pub fn uses_builtin_datasets(&self) -> bool {
        self.dataset_dir.is_empty()
    }

    /// 데이터셋 디렉토리 경로를 반환합니다 (내장 데이터셋 사용 시 `None`).
    pub fn dataset_path(&self) -> Option<PathBuf> {
        if self.uses_builtin_datasets() {
            None
        } else {
            Some(PathBuf::from(&self.dataset_dir))
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `max_file_size`: 1-16777216 (16MB)
    /// - `dataset_dir`: `..` 컴포넌트 금지, 4096바이트 이하
    pub fn validate(&self) -> Result<(), AllergenScannerError> {
        if self.max_file_size == 0 || self.max_file_size > MAX_DATASET_FILE_SIZE {
            return Err(AllergenScannerError::Config {
                field: "max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_DATASET_FILE_SIZE}"),
            });
        }

        if !self.dataset_dir.is_empty() {
            // Path traversal 체크: ParentDir 컴포넌트 검출
            if Path::new(&self.dataset_dir)
                .components()
                .any(|c| c == Component::ParentDir)
            {
                return Err(AllergenScannerError::Config {
                    field: "dataset_dir".to_owned(),
                    reason: "dataset_dir contains path traversal pattern '..'".to_owned(),
                });
            }

            if self.dataset_dir.len() > MAX_PATH_LEN {
                return Err(AllergenScannerError::Config {
                    field: "dataset_dir".to_owned(),
                    reason: format!("dataset_dir exceeds maximum length {MAX_PATH_LEN}"),
                });
            }
        }

        Ok(())
    }
}

/// [`AllergenScannerConfig`] 빌더
#[derive(Default)]
pub struct AllergenScannerConfigBuilder {
    config: AllergenScannerConfig,
}

impl AllergenScannerConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 데이터셋 디렉토리를 설정합니다.
    pub fn dataset_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.dataset_dir = dir.into();
        self
    }

    /// 데이터셋 파일 최대 크기(바이트)를 설정합니다.
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `AllergenScannerError::Config` 반환
    pub fn build(self) -> Result<AllergenScannerConfig, AllergenScannerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AllergenScannerConfig::default();
        config.validate().unwrap();
        assert!(config.uses_builtin_datasets());
        assert!(config.dataset_path().is_none());
    }

    #[test]
    fn from_core_preserves_values() {
        let core = canieat_core::config::CatalogConfig {
            dataset_dir: "/srv/canieat/data".to_owned(),
            max_file_size: 2048,
        };
        let config = AllergenScannerConfig::from_core(&core);
        assert_eq!(config.dataset_dir, "/srv/canieat/data");
        assert_eq!(config.max_file_size, 2048);
        assert_eq!(config.dataset_path(), Some(PathBuf::from("/srv/canieat/data")));
    }

    #[test]
    fn validate_rejects_zero_max_file_size() {
        let config = AllergenScannerConfig {
            max_file_size: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_file_size"));
    }

    #[test]
    fn validate_rejects_oversized_max_file_size() {
        let config = AllergenScannerConfig {
            max_file_size: MAX_DATASET_FILE_SIZE + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_path_traversal() {
        let config = AllergenScannerConfig {
            dataset_dir: "/srv/../etc".to_owned(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("path traversal"));
    }

    #[test]
    fn validate_rejects_overlong_path() {
        let config = AllergenScannerConfig {
            dataset_dir: "a".repeat(MAX_PATH_LEN + 1),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn dotted_file_names_are_not_traversal() {
        let config = AllergenScannerConfig {
            dataset_dir: "/srv/canieat..data".to_owned(),
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn builder_validates() {
        let result = AllergenScannerConfigBuilder::new().max_file_size(0).build();
        assert!(result.is_err());

        let config = AllergenScannerConfigBuilder::new()
            .dataset_dir("datasets")
            .build()
            .unwrap();
        assert_eq!(config.dataset_dir, "datasets");
    }
}
