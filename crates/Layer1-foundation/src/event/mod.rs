//! Event Payloads - 이벤트 소스와의 계약
//!
//! 리스너가 받는 `(EventPayload, 이벤트 이름)` 쌍을 정의합니다.
//!
//! ## 사용법
//!
//! ```ignore
//! use easyaudit_foundation::event::{names, AuthenticationEvent, EntityEvent, EventPayload};
//!
//! let login: EventPayload = AuthenticationEvent::new()
//!     .with_username("alice")
//!     .with_client_ip("10.0.0.7")
//!     .into();
//!
//! let removed: EventPayload = EntityEvent::new("App\\Entity\\Movie")
//!     .with_id("id", 42)
//!     .into();
//!
//! listener.on_event(&login, names::INTERACTIVE_LOGIN)?;
//! listener.on_event(&removed, names::PRE_REMOVE)?;
//! ```

pub mod types;

// Re-exports
pub use types::{
    names, AuthenticationError, AuthenticationEvent, EntityEvent, EventEnvelope, EventPayload,
};
