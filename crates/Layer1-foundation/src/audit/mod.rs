//! Audit Model - 감사 레코드 모델
//!
//! 해석기(resolver)와 로거 사이의 계약입니다.
//!
//! ## 사용법
//!
//! ```ignore
//! use easyaudit_foundation::audit::{AuditRecord, AuditType, AuditLevel, Identity};
//!
//! let record = AuditRecord::new(AuditType::LOGIN_FAILURE, "Login failed for alice")
//!     .with_metadata("attemptedUsername", "alice")
//!     .with_level(AuditLevel::Warning);
//!
//! assert!(!record.is_entity_deleted());
//! ```
//!
//! ## 기본 카테고리
//!
//! | 상수 | type id | 로거 동작 |
//! |------|---------|----------|
//! | `ENTITY_CREATED` | `entity.created` | 즉시 저장 |
//! | `ENTITY_UPDATED` | `entity.updated` | 즉시 저장 |
//! | `ENTITY_DELETED` | `entity.deleted` | flush까지 버퍼링 |
//! | `LOGIN_SUCCESS` | `login.success` | 즉시 저장 |
//! | `LOGIN_FAILURE` | `login.failure` | 즉시 저장 |

pub mod types;

// Re-exports
pub use types::{AuditId, AuditLevel, AuditRecord, AuditType, Identity};
