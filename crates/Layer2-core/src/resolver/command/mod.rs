//! Resolver Commands - 이벤트 하나를 감사 레코드로 변환하는 전략
//!
//! 커맨드는 자신이 이해하는 페이로드에서만 정보를 추출합니다.
//! 추출할 것이 없거나 입력이 예상과 다르면 `None`을 반환하며, 이 경우
//! 해석기가 기본 레코드로 대체합니다. 커맨드는 에러를 내거나 panic하지 않습니다.

mod entity;
mod failure;
mod login;

use easyaudit_foundation::{AuditRecord, EventPayload};

pub use entity::EntityLifecycleCommand;
pub use failure::AuthenticationFailedCommand;
pub use login::InteractiveLoginCommand;

/// 해석기 커맨드 trait
pub trait ResolverCommand: Send + Sync {
    /// 이벤트를 레코드로 변환 (할 말이 없으면 None)
    fn resolve(&self, event: &EventPayload) -> Option<AuditRecord>;
}

impl<F> ResolverCommand for F
where
    F: Fn(&EventPayload) -> Option<AuditRecord> + Send + Sync,
{
    fn resolve(&self, event: &EventPayload) -> Option<AuditRecord> {
        self(event)
    }
}
