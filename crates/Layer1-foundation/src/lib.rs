//! # easyaudit-foundation
//!
//! Foundation layer for EasyAudit:
//! - Audit: 감사 레코드 모델 (AuditRecord, AuditType, AuditLevel, Identity)
//! - Event: 이벤트 소스가 전달하는 원시 페이로드
//! - Storage: AuditStore trait, SQLite / 인메모리 구현
//! - Config: 통합 설정 (AuditConfig, ChannelFilter)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Event Source (ORM, 인증 시스템)                          │
//! │          │  (EventPayload, event name)                   │
//! │          ▼                                               │
//! │  easyaudit-core: Listener → Resolver → Logger            │
//! │          │  AuditRecord                                  │
//! │          ▼                                               │
//! │   AuditStore ──┬── SqliteStore                           │
//! │                └── MemoryStore                           │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod event;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Audit (감사 레코드)
// ============================================================================
pub use audit::{AuditId, AuditLevel, AuditRecord, AuditType, Identity};

// ============================================================================
// Event (원시 이벤트)
// ============================================================================
pub use event::{
    names as event_names, AuthenticationError, AuthenticationEvent, EntityEvent, EventEnvelope,
    EventPayload,
};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::{AuditQuery, AuditStatistics, AuditStore, MemoryStore, SqliteStore};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    AuditConfig, ChannelFilter, EntityAction, StorageConfig, AUDIT_CONFIG_FILE,
    DEFAULT_RETENTION_DAYS,
};
