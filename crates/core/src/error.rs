//! 에러 타입 — 도메인별 에러 정의

/// CanIEat 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum CanIEatError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 참조 데이터셋(알레르겐/제품/증상 카탈로그) 에러
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// 프로필 저장소 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 참조 데이터셋 에러
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 데이터셋 파일 로딩 실패
    #[error("failed to load dataset {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// 데이터셋 파싱 실패
    #[error("failed to parse dataset: {0}")]
    ParseFailed(String),

    /// 기본 키 중복
    #[error("duplicate id '{id}' in {dataset} dataset")]
    DuplicateId { dataset: String, id: String },
}

/// 프로필 저장소 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 저장된 프로필 읽기 실패
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// 프로필 쓰기 실패
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// 저장된 레코드 손상
    #[error("corrupt record: {0}")]
    Corrupt(String),
}
