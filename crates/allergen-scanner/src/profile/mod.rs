//! 사용자 프로필 저장소
//!
//! [`ProfileStore`]는 "현재 프로필" 하나를 명시적인 핸들로 관리합니다. 전역 상태 없이
//! 필요한 컴포넌트에 참조로 전달되며, 모든 읽기/쓰기는 하나의 `tokio::sync::Mutex`로
//! 직렬화됩니다.
//!
//! # 아키텍처
//!
//! ```text
//! ┌──────────────┐
//! │ ProfileStore │  current() / add_allergen() / update() / clear() ...
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌────────────────┐
//! │ ProfileStorage │ (trait)
//! └────────────────┘
//!      │        │
//!      ▼        ▼
//! ┌────────┐ ┌────────┐
//! │JsonFile│ │ Memory │
//! └────────┘ └────────┘
//! ```
//!
//! # 변경 규칙
//!
//! - 변경은 새 스냅샷을 계산하고, 저장에 성공한 뒤에만 메모리 스냅샷을 교체합니다.
//! - 저장 실패 시 에러를 로그에 남기고 반환하며, 메모리 스냅샷은 마지막 값으로 유지됩니다.
//! - 이미 있는 항목을 추가하면 저장하지 않습니다.
//! - 첫 저장이 성공하면 첫 실행 상태가 해제됩니다.

pub mod file;
pub mod memory;

use std::future::Future;

use metrics::counter;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use canieat_core::metrics as m;

use crate::error::AllergenScannerError;
use crate::types::{ProfileUpdate, UserProfile};

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

/// 프로필 저장 매체 추상화
///
/// 고정된 저장 키 하나에 프로필 레코드 하나를 보관합니다.
/// `Send + Sync + 'static`이므로 async 컨텍스트에서 안전하게 공유할 수 있습니다.
///
/// # 구현체
///
/// - [`JsonFileStorage`]: `<data_dir>/<storage_key>.json` 파일
/// - [`MemoryStorage`]: 프로세스 내 저장 (실패 주입 가능)
pub trait ProfileStorage: Send + Sync + 'static {
    /// 저장된 프로필을 읽습니다. 저장된 레코드가 없으면 `Ok(None)`.
    fn load(
        &self,
    ) -> impl Future<Output = Result<Option<UserProfile>, AllergenScannerError>> + Send;

    /// 프로필을 저장합니다.
    fn save(
        &self,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<(), AllergenScannerError>> + Send;
}

struct ProfileState {
    profile: UserProfile,
    first_launch: bool,
}

/// 현재 사용자 프로필 핸들
pub struct ProfileStore<S: ProfileStorage> {
    storage: S,
    state: Mutex<ProfileState>,
}

impl<S: ProfileStorage> ProfileStore<S> {
    /// 저장소에서 프로필을 읽어 핸들을 엽니다.
    ///
    /// - 저장된 레코드 없음: 빈 프로필, 첫 실행 상태
    /// - 읽기 실패: 로그를 남기고 빈 프로필로 시작 (첫 실행 아님)
    pub async fn open(storage: S) -> Self {
        let (profile, first_launch) = match storage.load().await {
            Ok(Some(profile)) => {
                debug!(allergens = profile.allergens.len(), "profile loaded");
                (profile.normalized(), false)
            }
            Ok(None) => {
                info!("no stored profile, first launch");
                (UserProfile::default(), true)
            }
            Err(e) => {
                warn!(error = %e, "failed to load profile, starting with empty profile");
                (UserProfile::default(), false)
            }
        };

        Self {
            storage,
            state: Mutex::new(ProfileState {
                profile,
                first_launch,
            }),
        }
    }

    /// 저장 매체 참조를 반환합니다.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 현재 프로필 스냅샷을 반환합니다.
    pub async fn current(&self) -> UserProfile {
        self.state.lock().await.profile.clone()
    }

    /// 저장된 프로필 없이 시작했고 아직 저장한 적이 없는지 확인합니다.
    pub async fn is_first_launch(&self) -> bool {
        self.state.lock().await.first_launch
    }

    /// 알레르겐을 추가합니다. 이미 있으면 저장하지 않습니다.
    pub async fn add_allergen(&self, id: &str) -> Result<UserProfile, AllergenScannerError> {
        self.mutate(|profile| profile.with_allergen(id)).await
    }

    /// 알레르겐을 제거합니다.
    pub async fn remove_allergen(&self, id: &str) -> Result<UserProfile, AllergenScannerError> {
        let mut state = self.state.lock().await;
        let next = state.profile.without_allergen(id);
        self.commit(&mut state, next).await
    }

    /// 식이 제한을 추가합니다. 이미 있으면 저장하지 않습니다.
    pub async fn add_dietary_restriction(
        &self,
        restriction: &str,
    ) -> Result<UserProfile, AllergenScannerError> {
        self.mutate(|profile| profile.with_dietary_restriction(restriction))
            .await
    }

    /// 식이 제한을 제거합니다.
    pub async fn remove_dietary_restriction(
        &self,
        restriction: &str,
    ) -> Result<UserProfile, AllergenScannerError> {
        let mut state = self.state.lock().await;
        let next = state.profile.without_dietary_restriction(restriction);
        self.commit(&mut state, next).await
    }

    /// 부분 업데이트를 적용합니다.
    pub async fn update(&self, update: ProfileUpdate) -> Result<UserProfile, AllergenScannerError> {
        let mut state = self.state.lock().await;
        let next = state.profile.merged(update);
        self.commit(&mut state, next).await
    }

    /// 프로필 전체를 교체합니다. 중복 항목은 제거됩니다.
    pub async fn replace(&self, profile: UserProfile) -> Result<UserProfile, AllergenScannerError> {
        let mut state = self.state.lock().await;
        self.commit(&mut state, profile.normalized()).await
    }

    /// 알레르겐과 식이 제한을 비웁니다.
    pub async fn clear(&self) -> Result<UserProfile, AllergenScannerError> {
        let mut state = self.state.lock().await;
        let next = state.profile.cleared();
        self.commit(&mut state, next).await
    }

    /// 현재 스냅샷에서 새 스냅샷을 계산해 저장합니다.
    ///
    /// 결과가 현재 스냅샷과 같으면 저장하지 않고 현재 값을 반환합니다.
    pub async fn mutate<F>(&self, f: F) -> Result<UserProfile, AllergenScannerError>
    where
        F: FnOnce(&UserProfile) -> UserProfile,
    {
        let mut state = self.state.lock().await;
        let next = f(&state.profile);
        if next == state.profile {
            debug!("profile unchanged, skipping save");
            return Ok(next);
        }
        self.commit(&mut state, next).await
    }

    async fn commit(
        &self,
        state: &mut ProfileState,
        next: UserProfile,
    ) -> Result<UserProfile, AllergenScannerError> {
        match self.storage.save(&next).await {
            Ok(()) => {
                counter!(m::PROFILE_SAVES_TOTAL, m::LABEL_RESULT => "success").increment(1);
                debug!(
                    allergens = next.allergens.len(),
                    restrictions = next.dietary_restrictions.len(),
                    "profile saved"
                );
                state.profile = next.clone();
                state.first_launch = false;
                Ok(next)
            }
            Err(e) => {
                counter!(m::PROFILE_SAVES_TOTAL, m::LABEL_RESULT => "failure").increment(1);
                warn!(error = %e, "failed to save profile, keeping last-known snapshot");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(allergens: &[&str]) -> UserProfile {
        UserProfile {
            allergens: allergens.iter().map(|s| (*s).to_owned()).collect(),
            ..UserProfile::default()
        }
    }

    #[tokio::test]
    async fn open_without_record_is_first_launch() {
        let store = ProfileStore::open(MemoryStorage::new()).await;
        assert!(store.is_first_launch().await);
        assert_eq!(store.current().await, UserProfile::default());
    }

    #[tokio::test]
    async fn open_with_record_loads_it() {
        let store = ProfileStore::open(MemoryStorage::with_profile(stored(&["milk"]))).await;
        assert!(!store.is_first_launch().await);
        assert_eq!(store.current().await.allergens, vec!["milk"]);
    }

    #[tokio::test]
    async fn open_dedups_stored_record() {
        let store =
            ProfileStore::open(MemoryStorage::with_profile(stored(&["milk", "milk"]))).await;
        assert_eq!(store.current().await.allergens, vec!["milk"]);
    }

    #[tokio::test]
    async fn load_failure_falls_back_to_empty_profile() {
        let storage = MemoryStorage::with_profile(stored(&["eggs"]));
        storage.fail_loads(true).await;
        let store = ProfileStore::open(storage).await;
        assert!(!store.is_first_launch().await);
        assert!(store.current().await.allergens.is_empty());
    }

    #[tokio::test]
    async fn first_save_clears_first_launch() {
        let store = ProfileStore::open(MemoryStorage::new()).await;
        store.add_allergen("peanuts").await.unwrap();
        assert!(!store.is_first_launch().await);
        assert_eq!(
            store.storage().stored().await.unwrap().allergens,
            vec!["peanuts"]
        );
    }

    #[tokio::test]
    async fn adding_existing_allergen_does_not_write() {
        let store = ProfileStore::open(MemoryStorage::with_profile(stored(&["milk"]))).await;
        let profile = store.add_allergen("milk").await.unwrap();
        assert_eq!(profile.allergens, vec!["milk"]);
        assert_eq!(store.storage().save_count().await, 0);
    }

    #[tokio::test]
    async fn remove_allergen_always_writes() {
        let store = ProfileStore::open(MemoryStorage::with_profile(stored(&["milk"]))).await;
        store.remove_allergen("soy").await.unwrap();
        assert_eq!(store.storage().save_count().await, 1);
        store.remove_allergen("milk").await.unwrap();
        assert!(store.current().await.allergens.is_empty());
    }

    #[tokio::test]
    async fn save_failure_keeps_last_known_snapshot() {
        let store = ProfileStore::open(MemoryStorage::with_profile(stored(&["milk"]))).await;
        store.storage().fail_saves(true).await;

        let err = store.add_allergen("soy").await.unwrap_err();
        assert!(matches!(err, AllergenScannerError::ProfileSave(_)));
        assert_eq!(store.current().await.allergens, vec!["milk"]);
        assert_eq!(store.storage().stored().await.unwrap().allergens, vec!["milk"]);

        store.storage().fail_saves(false).await;
        store.add_allergen("soy").await.unwrap();
        assert_eq!(store.current().await.allergens, vec!["milk", "soy"]);
    }

    #[tokio::test]
    async fn save_failure_keeps_first_launch() {
        let storage = MemoryStorage::new();
        storage.fail_saves(true).await;
        let store = ProfileStore::open(storage).await;
        assert!(store.add_allergen("milk").await.is_err());
        assert!(store.is_first_launch().await);
    }

    #[tokio::test]
    async fn dietary_restrictions_roundtrip() {
        let store = ProfileStore::open(MemoryStorage::new()).await;
        store.add_dietary_restriction("vegan").await.unwrap();
        store.add_dietary_restriction("vegan").await.unwrap();
        assert_eq!(store.storage().save_count().await, 1);
        store.remove_dietary_restriction("vegan").await.unwrap();
        assert!(store.current().await.dietary_restrictions.is_empty());
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = ProfileStore::open(MemoryStorage::with_profile(stored(&["milk"]))).await;
        let profile = store
            .update(ProfileUpdate {
                name: Some("Jordan".to_owned()),
                emergency_contact: Some("555-0199".to_owned()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap();
        assert_eq!(profile.allergens, vec!["milk"]);
        assert_eq!(profile.name.as_deref(), Some("Jordan"));
        assert_eq!(profile.emergency_contact.as_deref(), Some("555-0199"));
    }

    #[tokio::test]
    async fn replace_and_clear() {
        let store = ProfileStore::open(MemoryStorage::new()).await;
        let mut next = stored(&["fish", "fish", "soy"]);
        next.name = Some("Kai".to_owned());
        store.replace(next).await.unwrap();
        assert_eq!(store.current().await.allergens, vec!["fish", "soy"]);

        let cleared = store.clear().await.unwrap();
        assert!(cleared.allergens.is_empty());
        assert_eq!(cleared.name.as_deref(), Some("Kai"));
    }

    #[tokio::test]
    async fn concurrent_adds_are_serialized() {
        let store = std::sync::Arc::new(ProfileStore::open(MemoryStorage::new()).await);
        let mut handles = Vec::new();
        for id in ["milk", "eggs", "soy", "fish", "wheat"] {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.add_allergen(id).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let mut allergens = store.current().await.allergens;
        allergens.sort();
        assert_eq!(allergens, vec!["eggs", "fish", "milk", "soy", "wheat"]);
        assert_eq!(store.storage().stored().await.unwrap().allergens.len(), 5);
    }
}
