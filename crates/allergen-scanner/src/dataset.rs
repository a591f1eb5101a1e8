//! 참조 데이터셋 파일 로딩 공통 헬퍼
//!
//! # 디렉토리 구조
//!
//! ```text
//! {dataset_dir}/
//!   allergens.json   # AllergenRecord 배열
//!   products.json    # ProductRecord 배열
//!   symptoms.json    # SymptomGuide 배열
//! ```
//!
//! 파일이 없으면 해당 데이터셋은 내장 데이터로 대체됩니다.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::AllergenScannerError;

/// 알레르겐 데이터셋 파일명
pub const ALLERGENS_FILE: &str = "allergens.json";
/// 제품 데이터셋 파일명
pub const PRODUCTS_FILE: &str = "products.json";
/// 증상 데이터셋 파일명
pub const SYMPTOMS_FILE: &str = "symptoms.json";

/// 데이터셋 파일을 읽습니다.
///
/// 파일이 존재하지 않으면 `Ok(None)`을 반환합니다.
///
/// # Note
///
/// 이 함수는 동기 I/O를 수행합니다. async 컨텍스트에서 호출할 때는
/// `tokio::task::spawn_blocking`으로 감싸세요.
pub(crate) fn read_dataset_file(
    path: &Path,
    max_file_size: u64,
) -> Result<Option<String>, AllergenScannerError> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "dataset file not found");
            return Ok(None);
        }
        Err(e) => {
            return Err(AllergenScannerError::DatasetLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            });
        }
    };

    if !metadata.is_file() {
        return Err(AllergenScannerError::DatasetLoad {
            path: path.display().to_string(),
            reason: "not a regular file".to_owned(),
        });
    }

    let size = metadata.len();
    if size > max_file_size {
        return Err(AllergenScannerError::FileTooBig {
            path: path.display().to_string(),
            size,
            max: max_file_size,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| AllergenScannerError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(content))
}

/// JSON 배열을 레코드 목록으로 파싱합니다.
pub(crate) fn parse_records<T: DeserializeOwned>(
    dataset: &str,
    json: &str,
) -> Result<Vec<T>, AllergenScannerError> {
    serde_json::from_str(json).map_err(|e| AllergenScannerError::DatasetParse {
        dataset: dataset.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_dataset_file(&dir.path().join(ALLERGENS_FILE), 1024).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PRODUCTS_FILE);
        std::fs::write(&path, "[]".repeat(100)).unwrap();

        let err = read_dataset_file(&path, 10).unwrap_err();
        assert!(matches!(err, AllergenScannerError::FileTooBig { size: 200, max: 10, .. }));
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset_file(dir.path(), 1024).unwrap_err();
        assert!(matches!(err, AllergenScannerError::DatasetLoad { .. }));
    }

    #[test]
    fn parse_records_reports_dataset_name() {
        let err = parse_records::<String>("symptom", "{not json").unwrap_err();
        assert!(err.to_string().contains("symptom"));
    }
}
