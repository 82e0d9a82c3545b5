//! Tracing Logger - 감사 레코드를 `tracing` 이벤트로 출력

use super::AuditLogger;
use easyaudit_foundation::{AuditLevel, AuditRecord, Result};
use tracing::{debug, error, info, warn};

/// 감사 레코드를 애플리케이션 로그로 흘려보내는 로거 (버퍼 없음)
#[derive(Debug, Default)]
pub struct TracingLogger {
    emitted: u64,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 출력한 레코드 수
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl AuditLogger for TracingLogger {
    fn log(&mut self, record: Option<AuditRecord>) -> Result<()> {
        let Some(record) = record else {
            return Ok(());
        };

        let type_id = record.type_id().as_str();
        let actor = record.actor.as_ref().map(|a| a.username.as_str()).unwrap_or("-");
        let metadata = serde_json::to_string(&record.metadata)?;

        match record.level {
            AuditLevel::Debug => {
                debug!(target: "easyaudit", type_id, actor, %metadata, "{}", record.description)
            }
            AuditLevel::Info | AuditLevel::Notice => {
                info!(target: "easyaudit", type_id, actor, %metadata, "{}", record.description)
            }
            AuditLevel::Warning => {
                warn!(target: "easyaudit", type_id, actor, %metadata, "{}", record.description)
            }
            AuditLevel::Error | AuditLevel::Critical | AuditLevel::Alert | AuditLevel::Emergency => {
                error!(target: "easyaudit", type_id, actor, %metadata, "{}", record.description)
            }
        }

        self.emitted += 1;
        Ok(())
    }

    fn save_pending_logs(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easyaudit_foundation::AuditType;

    #[test]
    fn test_emits_without_buffering() {
        let mut logger = TracingLogger::new();
        logger
            .log(Some(
                AuditRecord::new(AuditType::LOGIN_FAILURE, "Authentication failed for alice")
                    .with_level(AuditLevel::Warning),
            ))
            .unwrap();
        logger
            .log(Some(AuditRecord::new(AuditType::ENTITY_DELETED, "Movie has been deleted")))
            .unwrap();
        logger.log(None).unwrap();

        assert_eq!(logger.emitted(), 2);
        assert_eq!(logger.pending(), 0);
        logger.save_pending_logs().unwrap();
    }
}
