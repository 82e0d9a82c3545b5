//! Event Resolver - 이벤트 이름으로 커맨드를 찾아 레코드를 만든다

use super::command::{
    AuthenticationFailedCommand, EntityLifecycleCommand, InteractiveLoginCommand, ResolverCommand,
};
use crate::user::UserContext;
use easyaudit_foundation::{event_names, AuditRecord, EventPayload};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// EventResolver Trait
// ============================================================================

/// 이벤트 해석기
///
/// `resolve`는 항상 레코드를 반환합니다. 매핑이 없거나 커맨드가 비어 있으면
/// 이벤트 이름을 type과 description으로 하는 기본 레코드를 돌려줍니다.
pub trait EventResolver: Send + Sync {
    fn resolve(&self, event: &EventPayload, event_name: &str) -> AuditRecord;

    /// 페이로드 형태로 이 해석기를 선택할 수 있는지 (팩토리의 3순위 선택)
    fn supports(&self, _event: &EventPayload) -> bool {
        false
    }
}

// ============================================================================
// CommandResolver
// ============================================================================

/// 페이로드 형태 판별 함수
pub type ShapeClaim = fn(&EventPayload) -> bool;

/// 이벤트 이름 → 커맨드 테이블 기반 해석기
///
/// 이름은 정확히 일치할 때만 매칭합니다 (와일드카드 없음).
#[derive(Default)]
pub struct CommandResolver {
    commands: HashMap<String, Box<dyn ResolverCommand>>,
    shape: Option<ShapeClaim>,
}

impl CommandResolver {
    /// 빈 테이블 (모든 이벤트가 기본 레코드)
    pub fn new() -> Self {
        Self::default()
    }

    /// 로그인 성공/실패 프리셋
    pub fn user_events(user_context: Arc<dyn UserContext>) -> Self {
        Self::new()
            .with_command(
                event_names::INTERACTIVE_LOGIN,
                InteractiveLoginCommand::new(user_context),
            )
            .with_command(
                event_names::AUTHENTICATION_FAILURE,
                AuthenticationFailedCommand::new(),
            )
    }

    /// 엔티티 라이프사이클 프리셋 (엔티티 페이로드를 형태로 선택)
    pub fn entity_events() -> Self {
        Self::new()
            .with_command(event_names::POST_PERSIST, EntityLifecycleCommand::created())
            .with_command(event_names::POST_UPDATE, EntityLifecycleCommand::updated())
            .with_command(event_names::PRE_REMOVE, EntityLifecycleCommand::deleted())
            .with_shape(|event| event.as_entity().is_some())
    }

    pub fn with_command(
        mut self,
        event_name: impl Into<String>,
        command: impl ResolverCommand + 'static,
    ) -> Self {
        self.insert(event_name, Box::new(command));
        self
    }

    pub fn with_shape(mut self, claim: ShapeClaim) -> Self {
        self.shape = Some(claim);
        self
    }

    /// 커맨드 등록 (같은 이름이면 교체)
    pub fn insert(&mut self, event_name: impl Into<String>, command: Box<dyn ResolverCommand>) {
        self.commands.insert(event_name.into(), command);
    }

    pub fn handles(&self, event_name: &str) -> bool {
        self.commands.contains_key(event_name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl EventResolver for CommandResolver {
    fn resolve(&self, event: &EventPayload, event_name: &str) -> AuditRecord {
        let Some(command) = self.commands.get(event_name) else {
            debug!(event = event_name, "No command mapped, using default record");
            return AuditRecord::default_for(event_name);
        };

        match command.resolve(event) {
            Some(record) => record,
            None => {
                debug!(event = event_name, "Command produced nothing, using default record");
                AuditRecord::default_for(event_name)
            }
        }
    }

    fn supports(&self, event: &EventPayload) -> bool {
        self.shape.is_some_and(|claim| claim(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{AnonymousContext, SharedUserContext};
    use easyaudit_foundation::{AuditType, AuthenticationEvent, EntityEvent, Identity};

    #[test]
    fn test_unmapped_event_gets_default_record() {
        let resolver = CommandResolver::new();
        let record = resolver.resolve(&EventPayload::empty(), "custom.unmapped");

        assert_eq!(record.type_id().as_str(), "custom.unmapped");
        assert_eq!(record.description, "custom.unmapped");
        assert!(record.metadata.is_empty());
    }

    #[test]
    fn test_empty_command_result_falls_back() {
        let resolver = CommandResolver::new().with_command("custom.noop", |_: &EventPayload| -> Option<AuditRecord> {
            None
        });
        let record = resolver.resolve(&EventPayload::empty(), "custom.noop");

        assert_eq!(record.type_id().as_str(), "custom.noop");
        assert_eq!(record.description, "custom.noop");
    }

    #[test]
    fn test_closure_command() {
        let resolver = CommandResolver::new().with_command("order.shipped", |_: &EventPayload| {
            Some(AuditRecord::new("order.shipped", "Order shipped"))
        });

        let record = resolver.resolve(&EventPayload::empty(), "order.shipped");
        assert_eq!(record.description, "Order shipped");
    }

    #[test]
    fn test_exact_match_only() {
        let resolver = CommandResolver::user_events(Arc::new(AnonymousContext));
        let event: EventPayload = AuthenticationEvent::new().with_username("alice").into();

        let record = resolver.resolve(&event, "security.authentication");
        assert_eq!(record.type_id().as_str(), "security.authentication");

        let record = resolver.resolve(&event, event_names::AUTHENTICATION_FAILURE);
        assert_eq!(record.type_id(), &AuditType::LOGIN_FAILURE);
    }

    #[test]
    fn test_user_events_preset() {
        let ctx = SharedUserContext::with_user(Identity::new("carol"));
        let resolver = CommandResolver::user_events(Arc::new(ctx));

        assert_eq!(resolver.len(), 2);
        assert!(resolver.handles(event_names::INTERACTIVE_LOGIN));
        assert!(!resolver.supports(&AuthenticationEvent::new().into()));

        let record = resolver.resolve(&EventPayload::empty(), event_names::INTERACTIVE_LOGIN);
        assert_eq!(record.description, "User carol logged in");
    }

    #[test]
    fn test_entity_events_claims_entity_shape() {
        let resolver = CommandResolver::entity_events();

        assert!(resolver.supports(&EntityEvent::new("Movie").into()));
        assert!(!resolver.supports(&AuthenticationEvent::new().into()));
        assert!(!resolver.handles(event_names::POST_REMOVE));
    }
}
