//! Resolver - 이벤트를 감사 레코드로 해석
//!
//! - `command`: 이벤트 한 종류를 레코드로 변환하는 전략 객체
//! - `event_resolver`: 이벤트 이름 → 커맨드 테이블
//! - `factory`: 이벤트마다 해석기 하나를 선택

pub mod command;
mod event_resolver;
mod factory;

pub use command::{
    AuthenticationFailedCommand, EntityLifecycleCommand, InteractiveLoginCommand, ResolverCommand,
};
pub use event_resolver::{CommandResolver, EventResolver, ShapeClaim};
pub use factory::{ResolverFactory, DEFAULT_RESOLVER, ENTITY_RESOLVER, USER_RESOLVER};
