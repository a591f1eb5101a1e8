//! 설정 관리 — canieat.toml 파싱 및 런타임 설정
//!
//! [`CanIEatConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`CANIEAT_GENERAL_LOG_LEVEL=debug` 형식)
//! 3. 설정 파일 (`canieat.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), canieat_core::error::CanIEatError> {
//! use canieat_core::config::CanIEatConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = CanIEatConfig::load("canieat.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = CanIEatConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CanIEatError, ConfigError};

/// 데이터셋 파일 최대 허용 크기 상한 (16 MiB)
pub const MAX_DATASET_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// CanIEat 통합 설정
///
/// `canieat.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanIEatConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 참조 데이터셋 설정
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// 사용자 프로필 저장 설정
    #[serde(default)]
    pub profile: ProfileConfig,
}

impl CanIEatConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CanIEatError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값으로 시작해 환경변수 오버라이드를 적용합니다.
    ///
    /// 파일이 존재하지만 파싱/검증에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, CanIEatError> {
        match Self::load(path.as_ref()).await {
            Err(CanIEatError::Config(ConfigError::FileNotFound { path })) => {
                tracing::debug!(path = %path, "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, CanIEatError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CanIEatError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CanIEatError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, CanIEatError> {
        toml::from_str(toml_str).map_err(|e| {
            CanIEatError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `CANIEAT_{SECTION}_{FIELD}`
    /// 예: `CANIEAT_CATALOG_DATASET_DIR=/opt/canieat/data`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "CANIEAT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "CANIEAT_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.data_dir, "CANIEAT_GENERAL_DATA_DIR");

        // Catalog
        override_string(
            &mut self.catalog.dataset_dir,
            "CANIEAT_CATALOG_DATASET_DIR",
        );
        override_u64(
            &mut self.catalog.max_file_size,
            "CANIEAT_CATALOG_MAX_FILE_SIZE",
        );

        // Profile
        override_string(&mut self.profile.storage_key, "CANIEAT_PROFILE_STORAGE_KEY");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), CanIEatError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.catalog.max_file_size == 0 || self.catalog.max_file_size > MAX_DATASET_FILE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "catalog.max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_DATASET_FILE_SIZE}"),
            }
            .into());
        }

        // storage_key는 파일명으로 쓰이므로 경로 구성요소가 될 수 없음
        let key = self.profile.storage_key.as_str();
        if key.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "profile.storage_key".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }
        if key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(ConfigError::InvalidValue {
                field: "profile.storage_key".to_owned(),
                reason: format!("'{key}' must not contain path separators or '..'"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 데이터 디렉토리. 비어 있으면 플랫폼 기본 데이터 디렉토리를 사용
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
            data_dir: String::new(),
        }
    }
}

/// 참조 데이터셋 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// `allergens.json`, `products.json`, `symptoms.json`을 담은 디렉토리.
    /// 비어 있으면 내장 데이터셋을 사용
    pub dataset_dir: String,
    /// 데이터셋 파일 최대 크기 (바이트)
    pub max_file_size: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dataset_dir: String::new(),
            max_file_size: 1024 * 1024, // 1MB
        }
    }
}

/// 사용자 프로필 저장 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// 저장 키 (data_dir 아래 `{storage_key}.json` 파일로 저장)
    pub storage_key: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            storage_key: "user_profile".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
