//! Store Logger - 저장소 기반 로거 (삭제 레코드 지연 저장)

use super::AuditLogger;
use easyaudit_foundation::{AuditRecord, AuditStore, Error, Result};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// 저장소 기반 로거
///
/// - 삭제가 아닌 레코드는 `log` 안에서 즉시 한 번 저장합니다.
/// - `entity.deleted` 레코드는 저장하지 않고 버퍼에 넣습니다. 삭제를 일으킨
///   작업이 확정된 뒤(`save_pending_logs`) 들어온 순서대로 저장됩니다.
pub struct StoreLogger<S: AuditStore> {
    store: S,
    pending: VecDeque<AuditRecord>,
}

impl<S: AuditStore> StoreLogger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            pending: VecDeque::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 버퍼에 남은 레코드 (저장 순서)
    pub fn pending_records(&self) -> impl Iterator<Item = &AuditRecord> {
        self.pending.iter()
    }

    /// 버퍼 비우기 (저장하지 않음, 작업 단위가 롤백된 경우)
    pub fn discard_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            debug!(dropped, "Pending audit records discarded");
        }
        dropped
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: AuditStore + Send> AuditLogger for StoreLogger<S> {
    fn log(&mut self, record: Option<AuditRecord>) -> Result<()> {
        let Some(record) = record else {
            return Ok(());
        };

        if record.is_entity_deleted() {
            debug!(id = %record.id, "Buffering delete record until flush");
            self.pending.push_back(record);
            return Ok(());
        }

        self.store.persist(&record)
    }

    /// FIFO 드레인
    ///
    /// 첫 실패에서 멈춥니다. 실패한 레코드와 그 뒤의 레코드는 버퍼에 남고,
    /// 이미 저장된 레코드만 제거됩니다. 다시 호출하면 남은 것부터 재시도합니다.
    fn save_pending_logs(&mut self) -> Result<()> {
        let mut persisted = 0;

        while let Some(record) = self.pending.front() {
            if let Err(e) = self.store.persist(record) {
                let remaining = self.pending.len();
                warn!(persisted, remaining, error = %e, "Pending audit drain failed");
                return Err(Error::partial_drain(persisted, remaining, e));
            }
            self.pending.pop_front();
            persisted += 1;
        }

        if persisted > 0 {
            debug!(persisted, "Pending audit records flushed");
        }
        Ok(())
    }

    fn pending(&self) -> usize {
        self.pending.len()
    }
}
