//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더 설치는 임베딩하는 쪽의 몫이며, 레코더가 없으면 기록은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `canieat_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(canieat_core::metrics::SCANS_TOTAL, "result" => "found").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (found/not_found, success/failure)
pub const LABEL_RESULT: &str = "result";

/// 안전 판정 레이블 키 (safe, caution, unsafe)
pub const LABEL_STATUS: &str = "status";

// ─── 스캐너 메트릭 ──────────────────────────────────────────────────

/// 바코드 조회 수 (counter, label: result)
pub const SCANS_TOTAL: &str = "canieat_scans_total";

/// 안전 판정 수 (counter, label: status)
pub const ANALYSIS_VERDICTS_TOTAL: &str = "canieat_analysis_verdicts_total";

// ─── 프로필 메트릭 ──────────────────────────────────────────────────

/// 프로필 저장 시도 수 (counter, label: result)
pub const PROFILE_SAVES_TOTAL: &str = "canieat_profile_saves_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_metrics() {
    metrics::describe_counter!(SCANS_TOTAL, "Barcode lookups by result");
    metrics::describe_counter!(
        ANALYSIS_VERDICTS_TOTAL,
        "Safety analyses by resulting status"
    );
    metrics::describe_counter!(PROFILE_SAVES_TOTAL, "Profile save attempts by result");
}
