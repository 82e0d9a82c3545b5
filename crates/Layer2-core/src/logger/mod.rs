//! Audit Logger - 해석된 레코드를 저장소로 보낸다
//!
//! ## 구현
//!
//! - [`StoreLogger`]: `AuditStore`에 저장, `entity.deleted`는 플러시까지 버퍼링
//! - [`TracingLogger`]: `tracing` 이벤트로 출력
//! - [`LoggerChain`]: 채널(레벨 필터)별로 여러 로거에 전달
//!
//! ## 사용법
//!
//! ```ignore
//! use easyaudit_core::{AuditLogger, StoreLogger};
//! use easyaudit_foundation::{AuditRecord, MemoryStore};
//!
//! let mut logger = StoreLogger::new(MemoryStore::new());
//! logger.log(Some(AuditRecord::new("entity.deleted", "Movie has been deleted")))?;
//! assert_eq!(logger.pending(), 1);
//!
//! logger.save_pending_logs()?;
//! assert_eq!(logger.pending(), 0);
//! ```

mod chain;
mod store;
mod trace_logger;

use easyaudit_foundation::{AuditRecord, Result};

pub use chain::LoggerChain;
pub use store::StoreLogger;
pub use trace_logger::TracingLogger;

// ============================================================================
// AuditLogger Trait
// ============================================================================

/// 감사 로거
///
/// 모든 변경 연산이 `&mut self`이므로 작업 단위 안에서는 호출이 직렬화됩니다.
pub trait AuditLogger: Send {
    /// 레코드 기록 (`None`이면 아무것도 하지 않음)
    fn log(&mut self, record: Option<AuditRecord>) -> Result<()>;

    /// 대기 중인 레코드를 저장소로 비움
    fn save_pending_logs(&mut self) -> Result<()>;

    /// 대기 중인 레코드 수
    fn pending(&self) -> usize {
        0
    }
}

impl<L: AuditLogger + ?Sized> AuditLogger for Box<L> {
    fn log(&mut self, record: Option<AuditRecord>) -> Result<()> {
        (**self).log(record)
    }

    fn save_pending_logs(&mut self) -> Result<()> {
        (**self).save_pending_logs()
    }

    fn pending(&self) -> usize {
        (**self).pending()
    }
}

impl<L: AuditLogger + ?Sized> AuditLogger for &mut L {
    fn log(&mut self, record: Option<AuditRecord>) -> Result<()> {
        (**self).log(record)
    }

    fn save_pending_logs(&mut self) -> Result<()> {
        (**self).save_pending_logs()
    }

    fn pending(&self) -> usize {
        (**self).pending()
    }
}
