//! Audit Record Types - 감사 레코드 타입 정의
//!
//! 이벤트 해석(resolve) 결과로 만들어지고 로거가 저장하는 구조화된 레코드입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

// ============================================================================
// Audit Record ID
// ============================================================================

/// 감사 레코드 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditId(pub String);

impl AuditId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for AuditId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuditId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Audit Type
// ============================================================================

/// 감사 레코드 카테고리 (type id)
///
/// 잘 알려진 카테고리는 상수로 제공하고, 매핑되지 않은 이벤트는 이벤트 이름을
/// 그대로 카테고리로 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditType(Cow<'static, str>);

impl AuditType {
    /// 엔티티 생성
    pub const ENTITY_CREATED: AuditType = AuditType(Cow::Borrowed("entity.created"));
    /// 엔티티 수정
    pub const ENTITY_UPDATED: AuditType = AuditType(Cow::Borrowed("entity.updated"));
    /// 엔티티 삭제 (로거에서 버퍼링됨)
    pub const ENTITY_DELETED: AuditType = AuditType(Cow::Borrowed("entity.deleted"));
    /// 로그인 성공
    pub const LOGIN_SUCCESS: AuditType = AuditType(Cow::Borrowed("login.success"));
    /// 로그인 실패
    pub const LOGIN_FAILURE: AuditType = AuditType(Cow::Borrowed("login.failure"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_entity_deleted(&self) -> bool {
        *self == Self::ENTITY_DELETED
    }
}

impl From<&str> for AuditType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AuditType {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AuditType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Audit Level
// ============================================================================

/// 감사 레코드 심각도 (PSR-3 레벨 체계)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    Debug,
    #[default]
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl AuditLevel {
    pub const ALL: [AuditLevel; 8] = [
        Self::Debug,
        Self::Info,
        Self::Notice,
        Self::Warning,
        Self::Error,
        Self::Critical,
        Self::Alert,
        Self::Emergency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Alert => "alert",
            Self::Emergency => "emergency",
        }
    }
}

impl FromStr for AuditLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::InvalidInput(format!("Unknown audit level: {}", s)))
    }
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Identity
// ============================================================================

/// 작업을 수행한 사용자/주체
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// 사용자 이름
    pub username: String,

    /// 대리 로그인(impersonation) 중인 원래 사용자
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonator: Option<String>,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            impersonator: None,
        }
    }

    pub fn impersonated_by(mut self, impersonator: impl Into<String>) -> Self {
        self.impersonator = Some(impersonator.into());
        self
    }
}

// ============================================================================
// Audit Record
// ============================================================================

/// 감사 레코드
///
/// 해석 시점에 생성되며, `type_id`는 생성 이후 바뀌지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// 고유 ID
    pub id: AuditId,

    /// 카테고리
    type_id: AuditType,

    /// 설명
    pub description: String,

    /// 추가 데이터 (엔티티 식별자, 사용자 이름, IP 등)
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,

    /// 심각도
    #[serde(default)]
    pub level: AuditLevel,

    /// 생성(해석) 시간
    pub timestamp: DateTime<Utc>,

    /// 작업 주체
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<Identity>,
}

impl AuditRecord {
    /// 새 감사 레코드 생성
    pub fn new(type_id: impl Into<AuditType>, description: impl Into<String>) -> Self {
        Self {
            id: AuditId::new(),
            type_id: type_id.into(),
            description: description.into(),
            metadata: BTreeMap::new(),
            level: AuditLevel::default(),
            timestamp: Utc::now(),
            actor: None,
        }
    }

    /// 매핑되지 않은 이벤트용 기본 레코드: type과 description 모두 이벤트 이름
    pub fn default_for(event_name: &str) -> Self {
        Self::new(event_name, event_name)
    }

    pub fn type_id(&self) -> &AuditType {
        &self.type_id
    }

    pub fn is_entity_deleted(&self) -> bool {
        self.type_id.is_entity_deleted()
    }

    /// 메타데이터 추가
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// 심각도 설정
    pub fn with_level(mut self, level: AuditLevel) -> Self {
        self.level = level;
        self
    }

    /// 작업 주체 설정
    pub fn with_actor(mut self, actor: Identity) -> Self {
        self.actor = Some(actor);
        self
    }

    /// 생성 시간 설정 (저장소 복원, 보관 기간 테스트용)
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}
