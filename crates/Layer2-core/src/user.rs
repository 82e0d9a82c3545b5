//! User Context - "누가 이 작업을 했는가"
//!
//! 인증 시스템이 보유한 현재 사용자에 대한 읽기 전용 접근자입니다.
//! 로그인 전환 중에도 값이 바뀔 수 있으므로 구현체는 값을 캐시하지 않습니다.

use easyaudit_foundation::Identity;
use parking_lot::RwLock;
use std::sync::Arc;

// ============================================================================
// UserContext Trait
// ============================================================================

/// 현재 사용자 제공자
pub trait UserContext: Send + Sync {
    /// 현재 인증된 사용자 (없으면 None)
    fn current_user(&self) -> Option<Identity>;
}

impl<T: UserContext + ?Sized> UserContext for Arc<T> {
    fn current_user(&self) -> Option<Identity> {
        (**self).current_user()
    }
}

// ============================================================================
// AnonymousContext
// ============================================================================

/// 사용자 정보가 없는 환경 (배치 작업, 시스템 이벤트)
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousContext;

impl UserContext for AnonymousContext {
    fn current_user(&self) -> Option<Identity> {
        None
    }
}

// ============================================================================
// SharedUserContext
// ============================================================================

/// 호스트가 갱신하는 공유 사용자 컨텍스트
///
/// 복제본끼리 같은 상태를 공유합니다. 호스트는 한쪽 핸들로 `set_user`를 호출하고,
/// 해석기 커맨드는 다른 핸들로 매번 최신 값을 읽습니다.
#[derive(Debug, Clone, Default)]
pub struct SharedUserContext {
    inner: Arc<RwLock<Option<Identity>>>,
}

impl SharedUserContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(identity: Identity) -> Self {
        let ctx = Self::new();
        ctx.set_user(identity);
        ctx
    }

    pub fn set_user(&self, identity: Identity) {
        *self.inner.write() = Some(identity);
    }

    pub fn clear(&self) {
        *self.inner.write() = None;
    }
}

impl UserContext for SharedUserContext {
    fn current_user(&self) -> Option<Identity> {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_no_user() {
        assert!(AnonymousContext.current_user().is_none());
    }

    #[test]
    fn test_shared_context_sees_updates() {
        let host = SharedUserContext::new();
        let reader: Arc<dyn UserContext> = Arc::new(host.clone());

        assert!(reader.current_user().is_none());

        host.set_user(Identity::new("alice"));
        assert_eq!(reader.current_user().unwrap().username, "alice");

        host.set_user(Identity::new("bob").impersonated_by("alice"));
        let user = reader.current_user().unwrap();
        assert_eq!(user.username, "bob");
        assert_eq!(user.impersonator.as_deref(), Some("alice"));

        host.clear();
        assert!(reader.current_user().is_none());
    }
}
