//! 프로세스 내 프로필 저장 매체
//!
//! 테스트와 임베딩 용도입니다. 읽기/쓰기 실패를 주입할 수 있습니다.

use tokio::sync::Mutex;

use crate::error::AllergenScannerError;
use crate::profile::ProfileStorage;
use crate::types::UserProfile;

#[derive(Debug, Default)]
struct MemoryState {
    record: Option<UserProfile>,
    fail_loads: bool,
    fail_saves: bool,
    save_count: usize,
}

/// 메모리 프로필 저장 매체
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    /// 비어 있는 저장 매체를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 프로필 레코드가 저장된 상태로 생성합니다.
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                record: Some(profile),
                ..MemoryState::default()
            }),
        }
    }

    /// 읽기 실패를 시뮬레이션할지 설정합니다.
    pub async fn fail_loads(&self, fail: bool) {
        self.state.lock().await.fail_loads = fail;
    }

    /// 쓰기 실패를 시뮬레이션할지 설정합니다.
    pub async fn fail_saves(&self, fail: bool) {
        self.state.lock().await.fail_saves = fail;
    }

    /// 현재 저장된 레코드를 반환합니다.
    pub async fn stored(&self) -> Option<UserProfile> {
        self.state.lock().await.record.clone()
    }

    /// 성공한 저장 횟수를 반환합니다.
    pub async fn save_count(&self) -> usize {
        self.state.lock().await.save_count
    }
}

impl ProfileStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<UserProfile>, AllergenScannerError> {
        let state = self.state.lock().await;
        if state.fail_loads {
            return Err(AllergenScannerError::ProfileLoad(
                "simulated load failure".to_owned(),
            ));
        }
        Ok(state.record.clone())
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), AllergenScannerError> {
        let mut state = self.state.lock().await;
        if state.fail_saves {
            return Err(AllergenScannerError::ProfileSave(
                "simulated save failure".to_owned(),
            ));
        }
        state.record = Some(profile.clone());
        state.save_count += 1;
        Ok(())
    }
}
