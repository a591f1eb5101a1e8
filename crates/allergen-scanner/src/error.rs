//! 알레르겐 스캐너 에러 타입
//!
//! [`AllergenScannerError`]는 스캐너 모듈 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<AllergenScannerError> for CanIEatError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! 안전 판정(`analyze`)과 바코드 조회(`find_by_barcode`)는 에러를 반환하지 않습니다.
//! 에러는 데이터셋 로딩, 설정, 프로필 저장소 경계에서만 발생합니다.
//!
//! # 에러 카테고리
//!
//! - **데이터셋**: `DatasetLoad`, `DatasetParse`, `DuplicateId`, `FileTooBig`
//! - **설정**: `Config`
//! - **프로필 저장소**: `ProfileLoad`, `ProfileSave`, `ProfileCorrupt`
//! - **파일 I/O**: `Io`

use canieat_core::error::{CanIEatError, CatalogError, StorageError};

/// 알레르겐 스캐너 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AllergenScannerError {
    /// 데이터셋 파일 로딩 실패
    #[error("dataset load error: {path}: {reason}")]
    DatasetLoad {
        /// 데이터셋 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 데이터셋 JSON 파싱 실패
    #[error("{dataset} dataset parse error: {reason}")]
    DatasetParse {
        /// 데이터셋 이름 (allergen, product, symptom)
        dataset: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 데이터셋 기본 키 중복
    #[error("duplicate {dataset} id: '{id}'")]
    DuplicateId {
        /// 데이터셋 이름
        dataset: String,
        /// 중복된 id
        id: String,
    },

    /// 파일 크기 초과
    #[error("file too large: {path}: {size} bytes (max: {max})")]
    FileTooBig {
        /// 파일 경로
        path: String,
        /// 실제 파일 크기 (바이트)
        size: u64,
        /// 최대 허용 크기 (바이트)
        max: u64,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 저장된 프로필 읽기 실패
    #[error("profile load error: {0}")]
    ProfileLoad(String),

    /// 프로필 저장 실패
    #[error("profile save error: {0}")]
    ProfileSave(String),

    /// 저장된 프로필 레코드 손상
    #[error("corrupt profile record: {path}: {reason}")]
    ProfileCorrupt {
        /// 프로필 파일 경로
        path: String,
        /// 역직렬화 실패 사유
        reason: String,
    },

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },
}

impl From<AllergenScannerError> for CanIEatError {
    fn from(err: AllergenScannerError) -> Self {
        match err {
            AllergenScannerError::DatasetLoad { path, reason } => {
                CanIEatError::Catalog(CatalogError::LoadFailed { path, reason })
            }
            AllergenScannerError::DatasetParse { dataset, reason } => CanIEatError::Catalog(
                CatalogError::ParseFailed(format!("{dataset} dataset: {reason}")),
            ),
            AllergenScannerError::DuplicateId { dataset, id } => {
                CanIEatError::Catalog(CatalogError::DuplicateId { dataset, id })
            }
            AllergenScannerError::FileTooBig { path, size, max } => {
                CanIEatError::Catalog(CatalogError::LoadFailed {
                    path,
                    reason: format!("file size {size} bytes exceeds maximum {max} bytes"),
                })
            }
            AllergenScannerError::Config { field, reason } => {
                CanIEatError::Config(canieat_core::error::ConfigError::InvalidValue {
                    field,
                    reason,
                })
            }
            AllergenScannerError::ProfileLoad(msg) => {
                CanIEatError::Storage(StorageError::ReadFailed(msg))
            }
            AllergenScannerError::ProfileSave(msg) => {
                CanIEatError::Storage(StorageError::WriteFailed(msg))
            }
            AllergenScannerError::ProfileCorrupt { path, reason } => {
                CanIEatError::Storage(StorageError::Corrupt(format!("{path}: {reason}")))
            }
            AllergenScannerError::Io { path, source } => CanIEatError::Io(std::io::Error::new(
                source.kind(),
                format!("{path}: {source}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_load_error_display() {
        let err = AllergenScannerError::DatasetLoad {
            path: "/opt/canieat/allergens.json".to_owned(),
            reason: "permission denied".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("allergens.json"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn duplicate_id_error_display() {
        let err = AllergenScannerError::DuplicateId {
            dataset: "product".to_owned(),
            id: "prod001".to_owned(),
        };
        assert_eq!(err.to_string(), "duplicate product id: 'prod001'");
    }

    #[test]
    fn file_too_big_error_display() {
        let err = AllergenScannerError::FileTooBig {
            path: "products.json".to_owned(),
            size: 2_000_000,
            max: 1_048_576,
        };
        let msg = err.to_string();
        assert!(msg.contains("2000000"));
        assert!(msg.contains("1048576"));
    }

    #[test]
    fn converts_dataset_errors_to_catalog() {
        let err: CanIEatError = AllergenScannerError::DatasetParse {
            dataset: "allergen".to_owned(),
            reason: "expected array".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            CanIEatError::Catalog(CatalogError::ParseFailed(_))
        ));

        let err: CanIEatError = AllergenScannerError::DuplicateId {
            dataset: "allergen".to_owned(),
            id: "milk".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            CanIEatError::Catalog(CatalogError::DuplicateId { .. })
        ));
    }

    #[test]
    fn converts_profile_errors_to_storage() {
        let err: CanIEatError = AllergenScannerError::ProfileSave("disk full".to_owned()).into();
        assert!(matches!(
            err,
            CanIEatError::Storage(StorageError::WriteFailed(_))
        ));

        let err: CanIEatError = AllergenScannerError::ProfileCorrupt {
            path: "user_profile.json".to_owned(),
            reason: "EOF".to_owned(),
        }
        .into();
        assert!(matches!(err, CanIEatError::Storage(StorageError::Corrupt(_))));
    }

    #[test]
    fn converts_io_error_preserving_kind() {
        let err: CanIEatError = AllergenScannerError::Io {
            path: "/tmp/x".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        match err {
            CanIEatError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied),
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
