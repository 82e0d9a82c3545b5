//! Logger Chain - 채널별로 여러 로거에 레코드 전달

use super::AuditLogger;
use easyaudit_foundation::{AuditConfig, AuditRecord, ChannelFilter, Result};
use tracing::{debug, warn};

struct ChainEntry {
    name: String,
    channel: ChannelFilter,
    logger: Box<dyn AuditLogger>,
}

/// 이름 붙은 로거 목록
///
/// 레코드 레벨을 받아들이는 로거에만 등록 순서대로 전달합니다.
/// `log`는 첫 에러에서 중단합니다. `save_pending_logs`는 모든 로거를 플러시한 뒤
/// 첫 에러를 반환합니다.
#[derive(Default)]
pub struct LoggerChain {
    entries: Vec<ChainEntry>,
}

impl LoggerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(
        mut self,
        name: impl Into<String>,
        channel: ChannelFilter,
        logger: impl AuditLogger + 'static,
    ) -> Self {
        self.push(name, channel, Box::new(logger));
        self
    }

    pub fn push(&mut self, name: impl Into<String>, channel: ChannelFilter, logger: Box<dyn AuditLogger>) {
        self.entries.push(ChainEntry {
            name: name.into(),
            channel,
            logger,
        });
    }

    /// 설정의 `channels`에서 채널을 찾아 등록
    pub fn push_configured(
        &mut self,
        config: &AuditConfig,
        name: impl Into<String>,
        logger: Box<dyn AuditLogger>,
    ) -> Result<()> {
        let name = name.into();
        let channel = config.channel(&name)?;
        self.push(name, channel, logger);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AuditLogger for LoggerChain {
    fn log(&mut self, record: Option<AuditRecord>) -> Result<()> {
        let Some(record) = record else {
            return Ok(());
        };

        for entry in &mut self.entries {
            if !entry.channel.accepts(record.level) {
                debug!(logger = %entry.name, level = %record.level, "Record outside channel");
                continue;
            }
            entry.logger.log(Some(record.clone()))?;
        }
        Ok(())
    }

    fn save_pending_logs(&mut self) -> Result<()> {
        let mut first_error = None;

        for entry in &mut self.entries {
            if let Err(e) = entry.logger.save_pending_logs() {
                warn!(logger = %entry.name, error = %e, "Failed to save pending logs");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn pending(&self) -> usize {
        self.entries.iter().map(|e| e.logger.pending()).sum()
    }
}
