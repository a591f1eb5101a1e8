//! JSON 파일 프로필 저장 매체
//!
//! 프로필 하나를 `<data_dir>/<storage_key>.json` 파일에 저장합니다.
//! 쓰기는 임시 파일에 기록한 뒤 rename하여 원자적으로 교체합니다.
//!
//! # 레코드 형식
//!
//! ```json
//! {
//!   "allergens": ["peanuts", "milk"],
//!   "dietaryRestrictions": ["vegetarian"],
//!   "name": "Sam",
//!   "emergencyContact": "555-0100"
//! }
//! ```

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::AllergenScannerError;
use crate::profile::ProfileStorage;
use crate::types::UserProfile;

/// 프로필 파일 최대 크기 기본값 (64KB)
pub const DEFAULT_MAX_PROFILE_SIZE: u64 = 64 * 1024;

/// JSON 파일 프로필 저장 매체
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    /// 프로필 파일 경로
    path: PathBuf,
    /// 읽기 허용 최대 크기 (바이트)
    max_file_size: u64,
}

impl JsonFileStorage {
    /// 데이터 디렉토리와 저장 키로 저장 매체를 생성합니다.
    ///
    /// 저장 키는 파일명 하나여야 합니다 (빈 문자열, 경로 구분자, `..` 금지).
    pub fn new(data_dir: impl Into<PathBuf>, storage_key: &str) -> Result<Self, AllergenScannerError> {
        validate_storage_key(storage_key)?;
        let path = data_dir.into().join(format!("{storage_key}.json"));
        Ok(Self {
            path,
            max_file_size: DEFAULT_MAX_PROFILE_SIZE,
        })
    }

    /// 읽기 허용 최대 크기를 설정합니다.
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// 프로필 파일 경로를 반환합니다.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProfileStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<UserProfile>, AllergenScannerError> {
        let shown = self.path.display().to_string();

        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %shown, "profile file not found");
                return Ok(None);
            }
            Err(e) => return Err(AllergenScannerError::ProfileLoad(format!("{shown}: {e}"))),
        };

        if metadata.len() > self.max_file_size {
            return Err(AllergenScannerError::FileTooBig {
                path: shown,
                size: metadata.len(),
                max: self.max_file_size,
            });
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AllergenScannerError::ProfileLoad(format!("{shown}: {e}")))?;

        let profile: UserProfile =
            serde_json::from_str(&content).map_err(|e| AllergenScannerError::ProfileCorrupt {
                path: shown,
                reason: e.to_string(),
            })?;

        Ok(Some(profile))
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), AllergenScannerError> {
        let shown = self.path.display().to_string();

        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| AllergenScannerError::ProfileSave(format!("{shown}: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AllergenScannerError::ProfileSave(format!("{shown}: {e}")))?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json.as_bytes())
            .await
            .map_err(|e| AllergenScannerError::ProfileSave(format!("{shown}: {e}")))?;

        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(AllergenScannerError::ProfileSave(format!("{shown}: {e}")));
        }

        debug!(path = %shown, "profile written");
        Ok(())
    }
}

fn validate_storage_key(key: &str) -> Result<(), AllergenScannerError> {
    let invalid = key.is_empty()
        || key.contains('/')
        || key.contains('\\')
        || Path::new(key)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
    if invalid {
        return Err(AllergenScannerError::Config {
            field: "storage_key".to_owned(),
            reason: format!("'{key}' must be a plain file name"),
        });
    }
    Ok(())
}
