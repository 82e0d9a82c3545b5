//! Audit Config - 통합 설정
//!
//! TOML 파일에서 로드하며, 글로벌 설정 위에 프로젝트 설정을 병합합니다.

use super::ChannelFilter;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 설정 파일명
pub const AUDIT_CONFIG_FILE: &str = "config.toml";

/// 기본 보관 기간 (일)
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

// ============================================================================
// Entity Action
// ============================================================================

/// 추적 대상 엔티티 액션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityAction {
    Created,
    Updated,
    Deleted,
}

impl EntityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

// ============================================================================
// Storage Config
// ============================================================================

/// 저장소 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite 파일 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// 보관 기간 (일)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
}

impl StorageConfig {
    /// DB 경로 (기본: `<data_local_dir>/easyaudit/audit.db`)
    pub fn db_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("easyaudit")
                .join("audit.db")
        })
    }

    pub fn retention_days(&self) -> u32 {
        self.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS)
    }

    fn merge(&mut self, other: StorageConfig) {
        if other.path.is_some() {
            self.path = other.path;
        }
        if other.retention_days.is_some() {
            self.retention_days = other.retention_days;
        }
    }
}

// ============================================================================
// Audit Config (통합)
// ============================================================================

/// EasyAudit 통합 설정
///
/// ```toml
/// [storage]
/// path = "/var/lib/easyaudit/audit.db"
/// retention_days = 30
///
/// [entities]
/// "App\\Entity\\Movie" = ["created", "deleted"]
/// "App\\Entity\\User" = []            # 모든 액션
///
/// [custom_resolvers]
/// "security.interactive_login" = "user"
///
/// [channels]
/// store = []                          # 모든 레벨
/// tracing = ["!debug", "!info"]       # debug/info 제외
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// 저장소
    pub storage: StorageConfig,

    /// 추적할 엔티티 클래스 → 액션 목록 (빈 목록 = 전체)
    pub entities: BTreeMap<String, Vec<EntityAction>>,

    /// 이벤트 이름 → 해석기 이름
    pub custom_resolvers: BTreeMap<String, String>,

    /// 로거 이름 → 레벨 채널
    pub channels: BTreeMap<String, Vec<String>>,
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::Config(format!("Cannot get current directory: {}", e)))?;
        let global_dir = dirs::config_dir().map(|dir| dir.join("easyaudit"));
        Self::load_from(global_dir.as_deref(), &cwd.join(".easyaudit"))
    }

    /// 지정한 디렉토리에서 글로벌 설정 위에 프로젝트 설정을 병합
    pub fn load_from(global_dir: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Some(dir) = global_dir {
            if let Some(global) = Self::load_optional(dir.join(AUDIT_CONFIG_FILE))? {
                config.merge(global);
            }
        }

        // 2. 프로젝트 설정
        if let Some(project) = Self::load_optional(project_dir.join(AUDIT_CONFIG_FILE))? {
            config.merge(project);
        }

        config.validate()?;
        Ok(config)
    }

    /// 파일에서 로드
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// TOML 문자열에서 로드
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 None
    fn load_optional(path: PathBuf) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::from_file(path).map(Some)
    }

    /// 채널 정의 검증
    pub fn validate(&self) -> Result<()> {
        for (logger, levels) in &self.channels {
            ChannelFilter::parse(levels.as_slice())
                .map_err(|e| Error::Config(format!("Invalid channel for '{}': {}", logger, e)))?;
        }
        Ok(())
    }

    /// 로거 채널 필터 (정의 없으면 전체 허용)
    pub fn channel(&self, logger: &str) -> Result<ChannelFilter> {
        match self.channels.get(logger) {
            Some(levels) => ChannelFilter::parse(levels.as_slice())
                .map_err(|e| Error::Config(format!("Invalid channel for '{}': {}", logger, e))),
            None => Ok(ChannelFilter::all()),
        }
    }

    /// 다른 설정을 위에 덮어쓰기
    pub fn merge(&mut self, other: AuditConfig) {
        self.storage.merge(other.storage);
        self.entities.extend(other.entities);
        self.custom_resolvers.extend(other.custom_resolvers);
        self.channels.extend(other.channels);
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.path = Some(path.into());
        self
    }

    pub fn track_entity(mut self, class: impl Into<String>, actions: Vec<EntityAction>) -> Self {
        self.entities.insert(class.into(), actions);
        self
    }

    pub fn route(mut self, event_name: impl Into<String>, resolver: impl Into<String>) -> Self {
        self.custom_resolvers
            .insert(event_name.into(), resolver.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLevel;

    const SAMPLE: &str = r#"
        [storage]
        path = "/tmp/audit.db"
        retention_days = 30

        [entities]
        "App\\Entity\\Movie" = ["created", "deleted"]
        "App\\Entity\\User" = []

        [custom_resolvers]
        "app.report.exported" = "user"

        [channels]
        tracing = ["!debug", "!info"]
    "#;

    #[test]
    fn test_config_default() {
        let config = AuditConfig::new();
        assert_eq!(config.storage.retention_days(), DEFAULT_RETENTION_DAYS);
        assert!(config.storage.db_path().ends_with("easyaudit/audit.db"));
        assert!(config.entities.is_empty());
    }

    #[test]
    fn test_parse_toml() {
        let config = AuditConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.storage.db_path(), PathBuf::from("/tmp/audit.db"));
        assert_eq!(config.storage.retention_days(), 30);
        assert_eq!(
            config.entities["App\\Entity\\Movie"],
            vec![EntityAction::Created, EntityAction::Deleted]
        );
        assert!(config.entities["App\\Entity\\User"].is_empty());
        assert_eq!(config.custom_resolvers["app.report.exported"], "user");

        let tracing = config.channel("tracing").unwrap();
        assert!(!tracing.accepts(AuditLevel::Info));
        assert!(tracing.accepts(AuditLevel::Warning));
        assert!(config.channel("store").unwrap().accepts(AuditLevel::Debug));
    }

    #[test]
    fn test_invalid_channel_rejected() {
        let err = AuditConfig::from_toml_str(
            r#"
            [channels]
            store = ["info", "!debug"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AuditConfig::new()
            .db_path("/global/audit.db")
            .route("a.event", "user");
        base.storage.retention_days = Some(10);

        let overlay = AuditConfig::new()
            .route("b.event", "entity")
            .track_entity("Order", vec![]);

        base.merge(overlay);

        assert_eq!(base.storage.db_path(), PathBuf::from("/global/audit.db"));
        assert_eq!(base.storage.retention_days(), 10);
        assert_eq!(base.custom_resolvers.len(), 2);
        assert!(base.entities.contains_key("Order"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AUDIT_CONFIG_FILE);
        std::fs::write(&path, SAMPLE).unwrap();

        let config = AuditConfig::from_file(&path).unwrap();
        assert_eq!(config.storage.retention_days(), 30);

        let missing = AuditConfig::from_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(Error::Config(_))));
    }

    #[test]
    fn test_channel_with_unknown_level_is_config_error() {
        let mut config = AuditConfig::new();
        config.channels.insert("store".into(), vec!["bogus".into()]);

        assert!(matches!(config.channel("store"), Err(Error::Config(_))));
        assert!(config.channel("tracing").is_ok());
    }

    #[test]
    fn test_load_merges_global_then_project() {
        let global = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        std::fs::write(
            global.path().join(AUDIT_CONFIG_FILE),
            r#"
            [storage]
            path = "/global/audit.db"
            retention_days = 10

            [custom_resolvers]
            "a.event" = "user"

            [channels]
            store = []
            "#,
        )
        .unwrap();
        std::fs::write(
            project.path().join(AUDIT_CONFIG_FILE),
            r#"
            [storage]
            path = "/project/audit.db"

            [entities]
            "App\\Entity\\Movie" = []
            "#,
        )
        .unwrap();

        let config = AuditConfig::load_from(Some(global.path()), project.path()).unwrap();
        assert_eq!(config.storage.db_path(), PathBuf::from("/project/audit.db"));
        assert_eq!(config.storage.retention_days(), 10);
        assert_eq!(config.custom_resolvers["a.event"], "user");
        assert!(config.entities.contains_key("App\\Entity\\Movie"));
        assert!(config.channels.contains_key("store"));
    }

    #[test]
    fn test_load_without_files() {
        let empty = tempfile::tempdir().unwrap();
        let missing = empty.path().join("nowhere");

        let config = AuditConfig::load_from(Some(&missing), empty.path()).unwrap();
        assert_eq!(config, AuditConfig::new());

        let config = AuditConfig::load_from(None, empty.path()).unwrap();
        assert!(config.entities.is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_project_channel() {
        let project = tempfile::tempdir().unwrap();
        std::fs::write(
            project.path().join(AUDIT_CONFIG_FILE),
            r#"
            [channels]
            store = ["info", "!debug"]
            "#,
        )
        .unwrap();

        let err = AuditConfig::load_from(None, project.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
