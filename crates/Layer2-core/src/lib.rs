//! easyaudit-core: 감사 파이프라인
//!
//! Layer2 - 이벤트 해석과 기록
//!
//! # 주요 모듈
//!
//! - `user`: 현재 사용자 제공자 (UserContext)
//! - `resolver`: 이벤트 → 감사 레코드 (커맨드, 해석기, 팩토리)
//! - `logger`: 레코드 저장 (StoreLogger, TracingLogger, LoggerChain)
//! - `listener`: 이벤트 소스 진입점 (AuditListener)
//! - `subscriber`: ORM 라이프사이클 연결 (EntitySubscriber)
//!
//! # 사용 예시
//!
//! ```ignore
//! use easyaudit_core::{AuditListener, EntitySubscriber, SharedUserContext, StoreLogger};
//! use easyaudit_foundation::{AuditConfig, EntityEvent, SqliteStore};
//! use std::sync::Arc;
//!
//! let config = AuditConfig::load()?;
//! let store = SqliteStore::open(config.storage.db_path())?;
//! let users = SharedUserContext::new();
//!
//! let mut listener = AuditListener::from_config(&config, StoreLogger::new(store), Arc::new(users.clone()))?;
//! let subscriber = EntitySubscriber::from_config(&config);
//!
//! // 삭제: preRemove에서 해석, postRemove에서 저장
//! let movie = EntityEvent::new("App\\Entity\\Movie").with_id("id", 1);
//! subscriber.pre_remove(&mut listener, &movie)?;
//! subscriber.post_remove(&mut listener)?;
//! ```

pub mod listener;
pub mod logger;
pub mod resolver;
pub mod subscriber;
pub mod user;

// Re-exports: User
pub use user::{AnonymousContext, SharedUserContext, UserContext};

// Re-exports: Resolver
pub use resolver::{
    AuthenticationFailedCommand, CommandResolver, EntityLifecycleCommand, EventResolver,
    InteractiveLoginCommand, ResolverCommand, ResolverFactory,
};

// Re-exports: Logger
pub use logger::{AuditLogger, LoggerChain, StoreLogger, TracingLogger};

// Re-exports: Listener / Subscriber
pub use listener::AuditListener;
pub use subscriber::{EntitySubscriber, TrackedEntities};
