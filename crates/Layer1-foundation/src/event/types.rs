//! Event Types - 외부 이벤트 소스가 전달하는 원시 이벤트 정의
//!
//! 이벤트 소스(프레임워크, ORM 등)는 이미 파싱된 페이로드와 식별자 값을 넘겨줍니다.

use crate::audit::Identity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Event Names
// ============================================================================

/// 잘 알려진 이벤트 이름
pub mod names {
    /// 대화형 로그인 성공
    pub const INTERACTIVE_LOGIN: &str = "security.interactive_login";
    /// 인증 실패
    pub const AUTHENTICATION_FAILURE: &str = "security.authentication.failure";
    /// 엔티티 저장 직후
    pub const POST_PERSIST: &str = "postPersist";
    /// 엔티티 수정 직후
    pub const POST_UPDATE: &str = "postUpdate";
    /// 엔티티 삭제 직전 (식별자가 아직 유효)
    pub const PRE_REMOVE: &str = "preRemove";
    /// 엔티티 삭제 직후 (flush 트리거)
    pub const POST_REMOVE: &str = "postRemove";

    /// 보안 이벤트 prefix
    pub const SECURITY_PREFIX: &str = "security.";
}

// ============================================================================
// Entity Event
// ============================================================================

/// 엔티티 라이프사이클 이벤트 페이로드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEvent {
    /// 엔티티 클래스 (예: "App\\Entity\\Movie")
    pub entity_class: String,

    /// 식별자 필드 → 값
    #[serde(default)]
    pub identifier: BTreeMap<String, Value>,

    /// 변경 내역 (수정 이벤트)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Value>,
}

impl EntityEvent {
    pub fn new(entity_class: impl Into<String>) -> Self {
        Self {
            entity_class: entity_class.into(),
            identifier: BTreeMap::new(),
            changes: None,
        }
    }

    /// 식별자 필드 추가
    pub fn with_id(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.identifier.insert(field.into(), value.into());
        self
    }

    /// 변경 내역 설정
    pub fn with_changes(mut self, changes: Value) -> Self {
        self.changes = Some(changes);
        self
    }

    /// 네임스페이스를 뗀 클래스 이름 ("App\\Entity\\Movie" → "Movie")
    pub fn short_class(&self) -> &str {
        self.entity_class
            .rsplit(|c: char| c == '\\' || c == ':' || c == '.')
            .find(|s| !s.is_empty())
            .unwrap_or(&self.entity_class)
    }
}

// ============================================================================
// Authentication Event
// ============================================================================

/// 인증 과정에서 발생한 에러 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationError {
    /// 에러 종류 (예: "BadCredentials")
    #[serde(default)]
    pub kind: String,

    /// 에러 메시지
    #[serde(default)]
    pub message: String,
}

/// 인증 이벤트 페이로드
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationEvent {
    /// 로그인한(또는 시도한) 사용자 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// 클라이언트 IP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,

    /// 방화벽/인증 영역 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall: Option<String>,

    /// 인증 실패 시 발생한 에러
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AuthenticationError>,
}

impl AuthenticationEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    pub fn with_firewall(mut self, firewall: impl Into<String>) -> Self {
        self.firewall = Some(firewall.into());
        self
    }

    pub fn with_error(mut self, kind: impl Into<String>, message: impl Into<String>) -> Self {
        self.error = Some(AuthenticationError {
            kind: kind.into(),
            message: message.into(),
        });
        self
    }
}

// ============================================================================
// EventPayload - 원시 이벤트
// ============================================================================

/// 이벤트 소스가 전달하는 원시 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// 엔티티 라이프사이클
    Entity(EntityEvent),
    /// 인증/로그인
    Authentication(AuthenticationEvent),
    /// 그 외 임의 이벤트
    Generic {
        #[serde(default)]
        data: Value,
    },
}

impl EventPayload {
    /// 데이터 없는 일반 이벤트
    pub fn empty() -> Self {
        Self::Generic { data: Value::Null }
    }

    pub fn generic(data: Value) -> Self {
        Self::Generic { data }
    }

    pub fn as_entity(&self) -> Option<&EntityEvent> {
        match self {
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_authentication(&self) -> Option<&AuthenticationEvent> {
        match self {
            Self::Authentication(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EntityEvent> for EventPayload {
    fn from(e: EntityEvent) -> Self {
        Self::Entity(e)
    }
}

impl From<AuthenticationEvent> for EventPayload {
    fn from(e: AuthenticationEvent) -> Self {
        Self::Authentication(e)
    }
}

// ============================================================================
// EventEnvelope - 직렬화된 이벤트 (JSON Lines 입력용)
// ============================================================================

/// 이름 + 페이로드 + (선택) 현재 사용자
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// 이벤트 이름
    pub name: String,

    /// 페이로드 (생략 시 빈 일반 이벤트)
    #[serde(default = "EventPayload::empty")]
    pub payload: EventPayload,

    /// 이벤트 시점의 로그인 사용자
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_class() {
        assert_eq!(EntityEvent::new("App\\Entity\\Movie").short_class(), "Movie");
        assert_eq!(EntityEvent::new("shop::model::Order").short_class(), "Order");
        assert_eq!(EntityEvent::new("Invoice").short_class(), "Invoice");
    }

    #[test]
    fn test_envelope_parsing() {
        let line = json!({
            "name": "security.authentication.failure",
            "payload": {
                "kind": "authentication",
                "username": "alice",
                "error": { "kind": "BadCredentials", "message": "Invalid credentials." }
            }
        });

        let envelope: EventEnvelope = serde_json::from_value(line).unwrap();
        let auth = envelope.payload.as_authentication().unwrap();
        assert_eq!(auth.username.as_deref(), Some("alice"));
        assert_eq!(auth.error.as_ref().unwrap().kind, "BadCredentials");
        assert!(envelope.user.is_none());
    }

    #[test]
    fn test_envelope_defaults_to_empty_payload() {
        let envelope: EventEnvelope =
            serde_json::from_value(json!({ "name": "custom.unmapped" })).unwrap();
        assert_eq!(envelope.payload, EventPayload::empty());
    }

    #[test]
    fn test_entity_payload_parsing() {
        let payload: EventPayload = serde_json::from_value(json!({
            "kind": "entity",
            "entity_class": "App\\Entity\\Movie",
            "identifier": { "id": 1 }
        }))
        .unwrap();

        let entity = payload.as_entity().unwrap();
        assert_eq!(entity.identifier["id"], json!(1));
        assert!(entity.changes.is_none());
    }
}
