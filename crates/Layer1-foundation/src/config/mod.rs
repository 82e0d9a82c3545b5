//! Config - 통합 설정 관리
//!
//! - `audit.rs` - AuditConfig 통합 설정 (저장소, 추적 엔티티, 해석기 라우팅)
//! - `channel.rs` - 로거별 레벨 채널

mod audit;
mod channel;

pub use audit::{
    AuditConfig, EntityAction, StorageConfig, AUDIT_CONFIG_FILE, DEFAULT_RETENTION_DAYS,
};
pub use channel::ChannelFilter;
