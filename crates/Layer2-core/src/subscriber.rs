//! Entity Subscriber - ORM 라이프사이클 이벤트를 리스너로 연결
//!
//! ## 순서
//!
//! ```text
//! preRemove   → 엔티티가 아직 존재할 때 해석, 삭제 레코드는 버퍼에 보관
//! (flush)     → ORM이 실제로 DELETE 수행
//! postRemove  → save_pending_logs() 로 버퍼 저장
//! ```

use crate::listener::AuditListener;
use crate::logger::AuditLogger;
use easyaudit_foundation::{
    event_names, AuditConfig, EntityAction, EntityEvent, EventPayload, Result,
};
use std::collections::BTreeMap;
use tracing::debug;

// ============================================================================
// TrackedEntities
// ============================================================================

/// 추적 대상 엔티티 클래스 목록
///
/// - 클래스가 없으면 추적하지 않음
/// - 액션 목록이 비어 있으면 모든 액션 추적
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedEntities {
    classes: BTreeMap<String, Vec<EntityAction>>,
}

impl TrackedEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            classes: config.entities.clone(),
        }
    }

    pub fn track(mut self, class: impl Into<String>, actions: Vec<EntityAction>) -> Self {
        self.classes.insert(class.into(), actions);
        self
    }

    pub fn is_tracked(&self, class: &str, action: EntityAction) -> bool {
        match self.classes.get(class) {
            Some(actions) => actions.is_empty() || actions.contains(&action),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

// ============================================================================
// EntitySubscriber
// ============================================================================

const SUBSCRIBED_EVENTS: [&str; 4] = [
    event_names::POST_PERSIST,
    event_names::POST_UPDATE,
    event_names::PRE_REMOVE,
    event_names::POST_REMOVE,
];

#[derive(Debug, Clone, Default)]
pub struct EntitySubscriber {
    tracked: TrackedEntities,
}

impl EntitySubscriber {
    pub fn new(tracked: TrackedEntities) -> Self {
        Self { tracked }
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(TrackedEntities::from_config(config))
    }

    pub fn tracked(&self) -> &TrackedEntities {
        &self.tracked
    }

    pub fn subscribed_events() -> &'static [&'static str] {
        &SUBSCRIBED_EVENTS
    }

    pub fn is_subscribed(event_name: &str) -> bool {
        SUBSCRIBED_EVENTS.iter().any(|e| *e == event_name)
    }

    pub fn post_persist<L: AuditLogger>(
        &self,
        listener: &mut AuditListener<L>,
        entity: &EntityEvent,
    ) -> Result<()> {
        self.forward(listener, event_names::POST_PERSIST, EntityAction::Created, entity)
    }

    pub fn post_update<L: AuditLogger>(
        &self,
        listener: &mut AuditListener<L>,
        entity: &EntityEvent,
    ) -> Result<()> {
        self.forward(listener, event_names::POST_UPDATE, EntityAction::Updated, entity)
    }

    pub fn pre_remove<L: AuditLogger>(
        &self,
        listener: &mut AuditListener<L>,
        entity: &EntityEvent,
    ) -> Result<()> {
        self.forward(listener, event_names::PRE_REMOVE, EntityAction::Deleted, entity)
    }

    /// 플러시 트리거 (추적 여부와 관계없이 항상 호출)
    pub fn post_remove<L: AuditLogger>(&self, listener: &mut AuditListener<L>) -> Result<()> {
        listener.save_pending_logs()
    }

    /// 이름으로 라이프사이클 이벤트 처리
    ///
    /// 구독하는 이벤트면 `true`. 엔티티 페이로드가 아니면 postRemove 외에는 무시합니다.
    pub fn handle<L: AuditLogger>(
        &self,
        listener: &mut AuditListener<L>,
        event_name: &str,
        payload: &EventPayload,
    ) -> Result<bool> {
        if event_name == event_names::POST_REMOVE {
            self.post_remove(listener)?;
            return Ok(true);
        }

        let action = match event_name {
            event_names::POST_PERSIST => EntityAction::Created,
            event_names::POST_UPDATE => EntityAction::Updated,
            event_names::PRE_REMOVE => EntityAction::Deleted,
            _ => return Ok(false),
        };

        if let Some(entity) = payload.as_entity() {
            self.forward(listener, event_name, action, entity)?;
        } else {
            debug!(event = event_name, "Lifecycle event without entity payload ignored");
        }
        Ok(true)
    }

    fn forward<L: AuditLogger>(
        &self,
        listener: &mut AuditListener<L>,
        event_name: &str,
        action: EntityAction,
        entity: &EntityEvent,
    ) -> Result<()> {
        if !self.tracked.is_tracked(&entity.entity_class, action) {
            debug!(class = %entity.entity_class, action = action.as_str(), "Entity not tracked");
            return Ok(());
        }
        listener.on_event(&EventPayload::Entity(entity.clone()), event_name)
    }
}
