//! 인증 실패 커맨드

use super::ResolverCommand;
use easyaudit_foundation::{AuditLevel, AuditRecord, AuditType, EventPayload};

/// `security.authentication.failure` → `login.failure`
///
/// 시도한 사용자 이름과 실패 사유(발생한 에러)를 메타데이터로 남깁니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthenticationFailedCommand;

impl AuthenticationFailedCommand {
    pub fn new() -> Self {
        Self
    }
}

impl ResolverCommand for AuthenticationFailedCommand {
    fn resolve(&self, event: &EventPayload) -> Option<AuditRecord> {
        let auth = event.as_authentication()?;
        let username = auth.username.as_deref().filter(|name| !name.is_empty());

        if username.is_none() && auth.error.is_none() {
            return None;
        }

        let description = match username {
            Some(name) => format!("Authentication failed for {}", name),
            None => "Authentication failed".to_string(),
        };

        let mut record = AuditRecord::new(AuditType::LOGIN_FAILURE, description)
            .with_level(AuditLevel::Warning);

        if let Some(name) = username {
            record = record.with_metadata("attemptedUsername", name);
        }
        if let Some(ref error) = auth.error {
            if !error.message.is_empty() {
                record = record.with_metadata("reason", error.message.clone());
            }
            if !error.kind.is_empty() {
                record = record.with_metadata("errorKind", error.kind.clone());
            }
        }
        if let Some(ref ip) = auth.client_ip {
            record = record.with_metadata("clientIp", ip.clone());
        }

        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easyaudit_foundation::{AuthenticationEvent, EntityEvent};

    #[test]
    fn test_failure_extracts_username_and_reason() {
        let event: EventPayload = AuthenticationEvent::new()
            .with_username("alice")
            .with_error("BadCredentials", "Invalid credentials.")
            .into();

        let record = AuthenticationFailedCommand.resolve(&event).unwrap();
        assert_eq!(record.type_id(), &AuditType::LOGIN_FAILURE);
        assert_eq!(record.level, AuditLevel::Warning);
        assert_eq!(record.description, "Authentication failed for alice");
        assert_eq!(record.metadata_str("attemptedUsername"), Some("alice"));
        assert_eq!(record.metadata_str("reason"), Some("Invalid credentials."));
        assert_eq!(record.metadata_str("errorKind"), Some("BadCredentials"));
    }

    #[test]
    fn test_failure_with_error_only() {
        let event: EventPayload = AuthenticationEvent::new()
            .with_error("AccountLocked", "")
            .into();

        let record = AuthenticationFailedCommand.resolve(&event).unwrap();
        assert_eq!(record.description, "Authentication failed");
        assert!(record.metadata.get("attemptedUsername").is_none());
        assert!(record.metadata.get("reason").is_none());
    }

    #[test]
    fn test_failure_degrades_to_empty() {
        assert!(AuthenticationFailedCommand
            .resolve(&AuthenticationEvent::new().into())
            .is_none());
        assert!(AuthenticationFailedCommand
            .resolve(&EntityEvent::new("Movie").into())
            .is_none());
    }
}
