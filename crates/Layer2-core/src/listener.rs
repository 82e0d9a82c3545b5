//! Audit Listener - 이벤트 소스와 파이프라인의 접점
//!
//! `on_event`는 해석(factory)과 기록(logger)을 순서대로 호출할 뿐 분기하지 않습니다.

use crate::logger::AuditLogger;
use crate::resolver::ResolverFactory;
use crate::user::UserContext;
use easyaudit_foundation::{AuditConfig, EventPayload, Result};
use std::sync::Arc;

pub struct AuditListener<L: AuditLogger> {
    factory: ResolverFactory,
    logger: L,
}

impl<L: AuditLogger> AuditListener<L> {
    pub fn new(factory: ResolverFactory, logger: L) -> Self {
        Self { factory, logger }
    }

    /// 표준 해석기 + 설정 라우트로 구성
    pub fn from_config(
        config: &AuditConfig,
        logger: L,
        user_context: Arc<dyn UserContext>,
    ) -> Result<Self> {
        let factory = ResolverFactory::from_config(config, user_context)?;
        Ok(Self::new(factory, logger))
    }

    /// 이벤트 하나 처리
    pub fn on_event(&mut self, event: &EventPayload, event_name: &str) -> Result<()> {
        let record = self.factory.get_event_log(event, event_name);
        self.logger.log(Some(record))
    }

    /// 플러시 트리거
    pub fn save_pending_logs(&mut self) -> Result<()> {
        self.logger.save_pending_logs()
    }

    pub fn factory(&self) -> &ResolverFactory {
        &self.factory
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut L {
        &mut self.logger
    }

    pub fn into_logger(self) -> L {
        self.logger
    }
}
