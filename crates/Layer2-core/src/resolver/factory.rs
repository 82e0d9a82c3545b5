//! Resolver Factory - 이벤트마다 해석기 하나를 선택
//!
//! ## 선택 순서
//!
//! 1. 이벤트 이름과 정확히 일치하는 라우트
//! 2. 가장 긴 이름 접두사 라우트
//! 3. 페이로드 형태를 `supports()`로 주장하는 첫 번째 해석기 (등록 순서)
//! 4. 기본 레코드
//!
//! 해석 후 레코드에 주체가 없으면 사용자 컨텍스트의 현재 사용자를 채웁니다.

use super::event_resolver::{CommandResolver, EventResolver};
use crate::user::UserContext;
use easyaudit_foundation::{event_names, AuditConfig, AuditRecord, Error, EventPayload, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 사용자 이벤트 해석기 이름
pub const USER_RESOLVER: &str = "user";
/// 엔티티 이벤트 해석기 이름
pub const ENTITY_RESOLVER: &str = "entity";
/// 빈 해석기 이름 (항상 기본 레코드)
pub const DEFAULT_RESOLVER: &str = "default";

#[derive(Default)]
pub struct ResolverFactory {
    /// 이름 → 해석기
    resolvers: HashMap<String, Arc<dyn EventResolver>>,

    /// 등록 순서 (형태 기반 선택용)
    order: Vec<String>,

    /// 이벤트 이름 → 해석기 이름
    routes: HashMap<String, String>,

    /// (접두사, 해석기 이름), 긴 접두사 우선
    prefixes: Vec<(String, String)>,

    user_context: Option<Arc<dyn UserContext>>,
}

impl ResolverFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 구성: `security.` 접두사 → user, 엔티티 페이로드 → entity
    pub fn standard(user_context: Arc<dyn UserContext>) -> Self {
        let mut factory = Self::new().with_user_context(user_context.clone());

        factory.register(USER_RESOLVER, Arc::new(CommandResolver::user_events(user_context)));
        factory.register(ENTITY_RESOLVER, Arc::new(CommandResolver::entity_events()));
        factory.register(DEFAULT_RESOLVER, Arc::new(CommandResolver::new()));

        factory.prefixes.push((
            event_names::SECURITY_PREFIX.to_string(),
            USER_RESOLVER.to_string(),
        ));

        factory
    }

    /// 기본 구성 + 설정의 `custom_resolvers` 라우트
    pub fn from_config(config: &AuditConfig, user_context: Arc<dyn UserContext>) -> Result<Self> {
        let mut factory = Self::standard(user_context);
        for (event_name, resolver) in &config.custom_resolvers {
            factory.route(event_name, resolver)?;
        }
        Ok(factory)
    }

    pub fn with_user_context(mut self, user_context: Arc<dyn UserContext>) -> Self {
        self.user_context = Some(user_context);
        self
    }

    // ========================================================================
    // 등록
    // ========================================================================

    /// 해석기 등록 (같은 이름이면 교체, 순서는 유지)
    pub fn register(&mut self, name: impl Into<String>, resolver: Arc<dyn EventResolver>) {
        let name = name.into();
        if self.resolvers.insert(name.clone(), resolver).is_some() {
            warn!(resolver = %name, "Resolver replaced");
        } else {
            self.order.push(name.clone());
        }
        debug!(resolver = %name, "Resolver registered");
    }

    /// 이벤트 이름 라우트 (미등록 해석기면 설정 에러)
    pub fn route(&mut self, event_name: impl Into<String>, resolver: &str) -> Result<()> {
        self.ensure_registered(resolver)?;
        self.routes.insert(event_name.into(), resolver.to_string());
        Ok(())
    }

    /// 이벤트 이름 접두사 라우트 (미등록 해석기면 설정 에러)
    pub fn route_prefix(&mut self, prefix: impl Into<String>, resolver: &str) -> Result<()> {
        self.ensure_registered(resolver)?;
        let prefix = prefix.into();
        self.prefixes.retain(|(p, _)| *p != prefix);
        self.prefixes.push((prefix, resolver.to_string()));
        self.prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(())
    }

    fn ensure_registered(&self, resolver: &str) -> Result<()> {
        if self.resolvers.contains_key(resolver) {
            Ok(())
        } else {
            Err(Error::Config(format!("Unknown resolver '{}'", resolver)))
        }
    }

    pub fn resolver(&self, name: &str) -> Option<&Arc<dyn EventResolver>> {
        self.resolvers.get(name)
    }

    pub fn resolver_names(&self) -> &[String] {
        &self.order
    }

    // ========================================================================
    // 해석
    // ========================================================================

    /// 이벤트 하나를 감사 레코드로 변환
    pub fn get_event_log(&self, event: &EventPayload, event_name: &str) -> AuditRecord {
        let mut record = match self.select(event, event_name) {
            Some((name, resolver)) => {
                debug!(event = event_name, resolver = %name, "Resolving event");
                resolver.resolve(event, event_name)
            }
            None => {
                debug!(event = event_name, "No resolver selected, using default record");
                AuditRecord::default_for(event_name)
            }
        };

        if record.actor.is_none() {
            if let Some(ref ctx) = self.user_context {
                record.actor = ctx.current_user();
            }
        }

        record
    }

    fn select(&self, event: &EventPayload, event_name: &str) -> Option<(&str, &Arc<dyn EventResolver>)> {
        let lookup = |name: &str| self.resolvers.get_key_value(name).map(|(k, v)| (k.as_str(), v));

        if let Some(name) = self.routes.get(event_name) {
            return lookup(name.as_str());
        }

        if let Some((_, name)) = self
            .prefixes
            .iter()
            .find(|(prefix, _)| event_name.starts_with(prefix.as_str()))
        {
            return lookup(name.as_str());
        }

        self.order
            .iter()
            .filter_map(|name| lookup(name.as_str()))
            .find(|(_, resolver)| resolver.supports(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{AnonymousContext, SharedUserContext};
    use easyaudit_foundation::{AuditType, AuthenticationEvent, EntityEvent, Identity};

    /// 이름만 기록하는 해석기
    struct Tagged(&'static str, bool);

    impl EventResolver for Tagged {
        fn resolve(&self, _event: &EventPayload, event_name: &str) -> AuditRecord {
            AuditRecord::new(event_name, self.0)
        }

        fn supports(&self, _event: &EventPayload) -> bool {
            self.1
        }
    }

    fn tagged_factory() -> ResolverFactory {
        let mut factory = ResolverFactory::new();
        factory.register("exact", Arc::new(Tagged("exact", false)));
        factory.register("short", Arc::new(Tagged("short", false)));
        factory.register("long", Arc::new(Tagged("long", false)));
        factory.register("shape", Arc::new(Tagged("shape", true)));
        factory.route("app.order.paid", "exact").unwrap();
        factory.route_prefix("app.", "short").unwrap();
        factory.route_prefix("app.order.", "long").unwrap();
        factory
    }

    #[test]
    fn test_precedence_exact_prefix_shape() {
        let factory = tagged_factory();
        let event = EventPayload::empty();

        assert_eq!(factory.get_event_log(&event, "app.order.paid").description, "exact");
        assert_eq!(factory.get_event_log(&event, "app.order.sent").description, "long");
        assert_eq!(factory.get_event_log(&event, "app.user.seen").description, "short");
        assert_eq!(factory.get_event_log(&event, "other").description, "shape");
    }

    #[test]
    fn test_nothing_selected_gives_default() {
        let mut factory = ResolverFactory::new();
        factory.register("never", Arc::new(Tagged("never", false)));

        let record = factory.get_event_log(&EventPayload::empty(), "custom.unmapped");
        assert_eq!(record.type_id().as_str(), "custom.unmapped");
        assert_eq!(record.description, "custom.unmapped");
        assert!(record.actor.is_none());
    }

    #[test]
    fn test_unknown_resolver_route_is_config_error() {
        let mut factory = ResolverFactory::new();

        assert!(matches!(factory.route("a", "missing"), Err(Error::Config(_))));
        assert!(matches!(factory.route_prefix("a.", "missing"), Err(Error::Config(_))));
    }

    #[test]
    fn test_standard_routes() {
        let factory = ResolverFactory::standard(Arc::new(AnonymousContext));

        let failure: EventPayload = AuthenticationEvent::new().with_username("alice").into();
        let record = factory.get_event_log(&failure, event_names::AUTHENTICATION_FAILURE);
        assert_eq!(record.type_id(), &AuditType::LOGIN_FAILURE);

        let entity: EventPayload = EntityEvent::new("Movie").with_id("id", 3).into();
        let record = factory.get_event_log(&entity, event_names::POST_PERSIST);
        assert_eq!(record.type_id(), &AuditType::ENTITY_CREATED);

        assert_eq!(factory.resolver_names(), ["user", "entity", "default"]);
    }

    #[test]
    fn test_config_routes_applied() {
        let config = AuditConfig::new().route("custom.login", "user");
        let factory = ResolverFactory::from_config(&config, Arc::new(AnonymousContext)).unwrap();

        // user 해석기에는 custom.login 커맨드가 없으므로 기본 레코드
        let record = factory.get_event_log(&AuthenticationEvent::new().into(), "custom.login");
        assert_eq!(record.type_id().as_str(), "custom.login");

        let bad = AuditConfig::new().route("custom.login", "nope");
        assert!(ResolverFactory::from_config(&bad, Arc::new(AnonymousContext)).is_err());
    }

    #[test]
    fn test_actor_filled_from_user_context() {
        let ctx = SharedUserContext::with_user(Identity::new("dave"));
        let factory = ResolverFactory::standard(Arc::new(ctx.clone()));

        let record = factory.get_event_log(&EventPayload::empty(), "custom.unmapped");
        assert_eq!(record.actor.unwrap().username, "dave");

        ctx.clear();
        let record = factory.get_event_log(&EventPayload::empty(), "custom.unmapped");
        assert!(record.actor.is_none());
    }
}
