//! 대화형 로그인 커맨드

use super::ResolverCommand;
use crate::user::UserContext;
use easyaudit_foundation::{AuditRecord, AuditType, EventPayload, Identity};
use std::sync::Arc;

/// `security.interactive_login` → `login.success`
///
/// 주체는 사용자 컨텍스트에서 먼저 찾고, 없으면 페이로드의 사용자 이름을 씁니다.
pub struct InteractiveLoginCommand {
    user_context: Arc<dyn UserContext>,
}

impl InteractiveLoginCommand {
    pub fn new(user_context: Arc<dyn UserContext>) -> Self {
        Self { user_context }
    }
}

impl ResolverCommand for InteractiveLoginCommand {
    fn resolve(&self, event: &EventPayload) -> Option<AuditRecord> {
        let auth = event.as_authentication();

        let actor = self.user_context.current_user().or_else(|| {
            auth.and_then(|a| a.username.as_deref())
                .filter(|name| !name.is_empty())
                .map(Identity::new)
        })?;

        let mut record = AuditRecord::new(
            AuditType::LOGIN_SUCCESS,
            format!("User {} logged in", actor.username),
        )
        .with_metadata("username", actor.username.clone());

        if let Some(auth) = auth {
            if let Some(ref ip) = auth.client_ip {
                record = record.with_metadata("clientIp", ip.clone());
            }
            if let Some(ref firewall) = auth.firewall {
                record = record.with_metadata("firewall", firewall.clone());
            }
        }

        Some(record.with_actor(actor))
    }
}
