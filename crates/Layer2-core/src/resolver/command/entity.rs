//! 엔티티 라이프사이클 커맨드

use super::ResolverCommand;
use easyaudit_foundation::{AuditRecord, AuditType, EntityAction, EventPayload};
use serde_json::Value;

/// 엔티티 이벤트 → `entity.created|updated|deleted`
///
/// 삭제 레코드는 엔티티가 실제로 사라지기 전(preRemove)에 해석되므로
/// 식별자를 이 시점에 메타데이터로 복사해 둡니다.
#[derive(Debug, Clone, Copy)]
pub struct EntityLifecycleCommand {
    action: EntityAction,
}

impl EntityLifecycleCommand {
    pub fn new(action: EntityAction) -> Self {
        Self { action }
    }

    pub fn created() -> Self {
        Self::new(EntityAction::Created)
    }

    pub fn updated() -> Self {
        Self::new(EntityAction::Updated)
    }

    pub fn deleted() -> Self {
        Self::new(EntityAction::Deleted)
    }

    pub fn audit_type(&self) -> AuditType {
        match self.action {
            EntityAction::Created => AuditType::ENTITY_CREATED,
            EntityAction::Updated => AuditType::ENTITY_UPDATED,
            EntityAction::Deleted => AuditType::ENTITY_DELETED,
        }
    }
}

impl ResolverCommand for EntityLifecycleCommand {
    fn resolve(&self, event: &EventPayload) -> Option<AuditRecord> {
        let entity = event.as_entity()?;
        if entity.entity_class.is_empty() {
            return None;
        }

        let identifier: serde_json::Map<String, Value> = entity
            .identifier
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut record = AuditRecord::new(
            self.audit_type(),
            format!("{} has been {}", entity.short_class(), self.action.as_str()),
        )
        .with_metadata("entityClass", entity.entity_class.clone())
        .with_metadata("identifier", Value::Object(identifier));

        if let Some(ref changes) = entity.changes {
            record = record.with_metadata("changes", changes.clone());
        }

        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easyaudit_foundation::{AuthenticationEvent, EntityEvent};
    use serde_json::json;

    #[test]
    fn test_deleted_captures_identifier() {
        let event: EventPayload = EntityEvent::new("App\\Entity\\Movie").with_id("id", 1).into();

        let record = EntityLifecycleCommand::deleted().resolve(&event).unwrap();
        assert!(record.is_entity_deleted());
        assert_eq!(record.description, "Movie has been deleted");
        assert_eq!(record.metadata["identifier"], json!({ "id": 1 }));
        assert_eq!(record.metadata_str("entityClass"), Some("App\\Entity\\Movie"));
    }

    #[test]
    fn test_updated_keeps_changes() {
        let event: EventPayload = EntityEvent::new("Order")
            .with_id("id", 7)
            .with_changes(json!({ "status": ["new", "paid"] }))
            .into();

        let record = EntityLifecycleCommand::updated().resolve(&event).unwrap();
        assert_eq!(record.type_id(), &AuditType::ENTITY_UPDATED);
        assert_eq!(record.metadata["changes"]["status"][1], "paid");
    }

    #[test]
    fn test_non_entity_payload_is_empty() {
        let command = EntityLifecycleCommand::created();
        assert!(command.resolve(&AuthenticationEvent::new().into()).is_none());
        assert!(command.resolve(&EntityEvent::new("").into()).is_none());
    }
}
