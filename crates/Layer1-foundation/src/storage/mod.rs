//! Storage module for EasyAudit
//!
//! - `memory`: 프로세스 내 저장소 (테스트, 임베딩)
//! - `db`: SQLite - 감사 레코드 영구 저장 및 조회
//!
//! 모든 구현은 `persist` 호출 한 번이 곧 한 번의 커밋입니다.
//! 트랜잭션 API는 노출하지 않습니다.

mod db;
mod memory;

use crate::audit::AuditRecord;
use crate::Result;
use std::sync::Arc;

// SQLite Storage
pub use db::{AuditQuery, AuditStatistics, SqliteStore};

// In-memory Storage
pub use memory::MemoryStore;

// ============================================================================
// AuditStore Trait
// ============================================================================

/// 감사 레코드 저장소
///
/// 실패는 호출자에게 그대로 전파되며 재시도하지 않습니다.
pub trait AuditStore {
    /// 레코드 하나를 저장하고 커밋
    fn persist(&self, record: &AuditRecord) -> Result<()>;
}

impl<S: AuditStore + ?Sized> AuditStore for &S {
    fn persist(&self, record: &AuditRecord) -> Result<()> {
        (**self).persist(record)
    }
}

impl<S: AuditStore + ?Sized> AuditStore for Arc<S> {
    fn persist(&self, record: &AuditRecord) -> Result<()> {
        (**self).persist(record)
    }
}

impl<S: AuditStore + ?Sized> AuditStore for Box<S> {
    fn persist(&self, record: &AuditRecord) -> Result<()> {
        (**self).persist(record)
    }
}
