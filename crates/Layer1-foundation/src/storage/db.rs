//! SQLite Storage for audit records
//!
//! 감사 레코드를 `audit_log` 테이블에 저장하고 조회합니다.
//! 각 `persist`는 autocommit INSERT 한 번입니다.

use super::AuditStore;
use crate::audit::{AuditId, AuditLevel, AuditRecord, AuditType, Identity};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

const SELECT_COLUMNS: &str =
    "SELECT id, type_id, description, metadata, level, timestamp, actor, impersonator FROM audit_log";

// ============================================================================
// AuditQuery
// ============================================================================

/// 감사 레코드 조회 조건
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// 카테고리 필터
    pub type_ids: Option<Vec<String>>,

    /// 작업 주체 필터
    pub actor: Option<String>,

    /// 최소 심각도
    pub min_level: Option<AuditLevel>,

    /// 시작 시간
    pub from: Option<DateTime<Utc>>,

    /// 종료 시간
    pub to: Option<DateTime<Utc>>,

    /// 최대 개수
    pub limit: Option<usize>,

    /// 건너뛸 개수
    pub offset: Option<usize>,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(mut self, type_ids: Vec<String>) -> Self {
        self.type_ids = Some(type_ids);
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_min_level(mut self, level: AuditLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    pub fn with_range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

// ============================================================================
// AuditStatistics
// ============================================================================

/// 감사 레코드 통계
#[derive(Debug, Clone, Default)]
pub struct AuditStatistics {
    pub total_records: u64,
    pub by_type: BTreeMap<String, u64>,
    pub by_level: BTreeMap<String, u64>,
}

// ============================================================================
// SqliteStore
// ============================================================================

/// SQLite 감사 저장소
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// 파일 DB 열기 (상위 디렉토리 생성)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Storage(format!("Failed to create data directory: {}", e))
                })?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| Error::Storage(format!("Failed to set pragmas: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;

        info!(db_path = %path.display(), "Audit store opened");
        Ok(store)
    }

    /// 인메모리 DB (테스트용)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Storage(format!("Failed to create in-memory database: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Internal("Lock poisoned".to_string()))
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                id TEXT PRIMARY KEY,
                type_id TEXT NOT NULL,
                description TEXT NOT NULL,
                metadata TEXT NOT NULL,
                level TEXT NOT NULL,
                level_rank INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                actor TEXT,
                impersonator TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp);
            CREATE INDEX IF NOT EXISTS idx_audit_type ON audit_log(type_id);
            CREATE INDEX IF NOT EXISTS idx_audit_actor ON audit_log(actor);
            "#,
        )?;

        Ok(())
    }

    /// ID로 조회
    pub fn get(&self, id: &AuditId) -> Result<Option<AuditRecord>> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id.0],
                RawRow::from_row,
            )
            .optional()?;

        row.map(RawRow::into_record).transpose()
    }

    /// 조건 조회 (최신순)
    pub fn query(&self, query: &AuditQuery) -> Result<Vec<AuditRecord>> {
        let conn = self.lock()?;

        let mut sql = format!("{} WHERE 1=1", SELECT_COLUMNS);
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref type_ids) = query.type_ids {
            if type_ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders: Vec<&str> = type_ids.iter().map(|_| "?").collect();
            sql.push_str(&format!(" AND type_id IN ({})", placeholders.join(", ")));
            for type_id in type_ids {
                params_vec.push(Box::new(type_id.clone()));
            }
        }

        if let Some(ref actor) = query.actor {
            sql.push_str(" AND actor = ?");
            params_vec.push(Box::new(actor.clone()));
        }

        if let Some(level) = query.min_level {
            sql.push_str(" AND level_rank >= ?");
            params_vec.push(Box::new(level as i64));
        }

        if let Some(ref from) = query.from {
            sql.push_str(" AND timestamp >= ?");
            params_vec.push(Box::new(format_timestamp(from)));
        }
        if let Some(ref to) = query.to {
            sql.push_str(" AND timestamp <= ?");
            params_vec.push(Box::new(format_timestamp(to)));
        }

        sql.push_str(" ORDER BY timestamp DESC, rowid DESC");

        match (query.limit, query.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset))
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_refs.as_slice(), RawRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(RawRow::into_record).collect()
    }

    /// 최근 레코드
    pub fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>> {
        self.query(&AuditQuery::new().with_limit(limit))
    }

    /// 전체 레코드 수
    pub fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let total: u64 = conn.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;
        Ok(total)
    }

    /// 통계 계산
    pub fn statistics(&self) -> Result<AuditStatistics> {
        let conn = self.lock()?;

        let total_records: u64 =
            conn.query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;

        let by_type = group_counts(&conn, "type_id")?;
        let by_level = group_counts(&conn, "level")?;

        Ok(AuditStatistics {
            total_records,
            by_type,
            by_level,
        })
    }

    /// 보관 기간이 지난 레코드 삭제
    pub fn cleanup(&self, days: u32) -> Result<u64> {
        let cutoff = Utc::now()
            .checked_sub_signed(chrono::Duration::days(days as i64))
            .ok_or_else(|| {
                Error::InvalidInput(format!("Retention of {} days is out of range", days))
            })?;

        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM audit_log WHERE timestamp < ?1",
            params![format_timestamp(&cutoff)],
        )?;

        if deleted > 0 {
            info!(deleted = deleted, days = days, "Cleaned up old audit records");
        }

        Ok(deleted as u64)
    }
}

impl AuditStore for SqliteStore {
    fn persist(&self, record: &AuditRecord) -> Result<()> {
        let conn = self.lock()?;

        let metadata = serde_json::to_string(&record.metadata)?;
        let (actor, impersonator) = match record.actor {
            Some(ref identity) => (
                Some(identity.username.as_str()),
                identity.impersonator.as_deref(),
            ),
            None => (None, None),
        };

        conn.execute(
            r#"
            INSERT INTO audit_log (
                id, type_id, description, metadata, level, level_rank,
                timestamp, actor, impersonator
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.id.0,
                record.type_id().as_str(),
                record.description,
                metadata,
                record.level.as_str(),
                record.level as i64,
                format_timestamp(&record.timestamp),
                actor,
                impersonator,
            ],
        )?;

        debug!(
            audit_id = %record.id,
            type_id = %record.type_id(),
            "Audit record persisted"
        );

        Ok(())
    }
}

// ============================================================================
// 헬퍼
// ============================================================================

/// 고정 폭 UTC 포맷 (문자열 비교 = 시간 비교)
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn group_counts(conn: &Connection, column: &str) -> Result<BTreeMap<String, u64>> {
    let mut counts = BTreeMap::new();
    let mut stmt = conn.prepare(&format!(
        "SELECT {col}, COUNT(*) FROM audit_log GROUP BY {col}",
        col = column
    ))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let key: String = row.get(0)?;
        let count: u64 = row.get(1)?;
        counts.insert(key, count);
    }
    Ok(counts)
}

/// DB 행 원본 (변환 전)
struct RawRow {
    id: String,
    type_id: String,
    description: String,
    metadata: String,
    level: String,
    timestamp: String,
    actor: Option<String>,
    impersonator: Option<String>,
}

impl RawRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            type_id: row.get("type_id")?,
            description: row.get("description")?,
            metadata: row.get("metadata")?,
            level: row.get("level")?,
            timestamp: row.get("timestamp")?,
            actor: row.get("actor")?,
            impersonator: row.get("impersonator")?,
        })
    }

    fn into_record(self) -> Result<AuditRecord> {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                Error::Storage(format!("Invalid timestamp '{}': {}", self.timestamp, e))
            })?;

        let mut record = AuditRecord::new(AuditType::new(self.type_id), self.description)
            .with_level(self.level.parse()?)
            .with_timestamp(timestamp);
        record.id = AuditId(self.id);
        record.metadata = serde_json::from_str(&self.metadata)?;
        record.actor = self.actor.map(|username| Identity {
            username,
            impersonator: self.impersonator,
        });

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(type_id: AuditType, user: &str) -> AuditRecord {
        AuditRecord::new(type_id, format!("{} did something", user))
            .with_metadata("username", user)
            .with_actor(Identity::new(user))
    }

    #[test]
    fn test_persist_and_get() {
        let store = SqliteStore::in_memory().unwrap();
        let record = sample(AuditType::LOGIN_SUCCESS, "alice")
            .with_actor(Identity::new("alice").impersonated_by("root"));

        store.persist(&record).unwrap();

        let loaded = store.get(&record.id).unwrap().unwrap();
        assert_eq!(loaded.type_id(), &AuditType::LOGIN_SUCCESS);
        assert_eq!(loaded.metadata_str("username"), Some("alice"));
        assert_eq!(
            loaded.actor.unwrap().impersonator.as_deref(),
            Some("root")
        );
        assert!(store.get(&AuditId::new()).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_id_is_storage_failure() {
        let store = SqliteStore::in_memory().unwrap();
        let record = sample(AuditType::ENTITY_CREATED, "bob");

        store.persist(&record).unwrap();
        let err = store.persist(&record).unwrap_err();
        assert!(err.is_persistence_failure());
    }

    #[test]
    fn test_query_filters() {
        let store = SqliteStore::in_memory().unwrap();
        store.persist(&sample(AuditType::LOGIN_SUCCESS, "alice")).unwrap();
        store
            .persist(&sample(AuditType::LOGIN_FAILURE, "mallory").with_level(AuditLevel::Warning))
            .unwrap();
        store.persist(&sample(AuditType::ENTITY_CREATED, "alice")).unwrap();

        let failures = store
            .query(&AuditQuery::new().with_types(vec!["login.failure".into()]))
            .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].level, AuditLevel::Warning);

        let by_alice = store.query(&AuditQuery::new().with_actor("alice")).unwrap();
        assert_eq!(by_alice.len(), 2);

        let warnings = store
            .query(&AuditQuery::new().with_min_level(AuditLevel::Warning))
            .unwrap();
        assert_eq!(warnings.len(), 1);

        let recent = store.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].type_id(), &AuditType::ENTITY_CREATED);

        let skipped = store.query(&AuditQuery::new().with_offset(2)).unwrap();
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn test_statistics() {
        let store = SqliteStore::in_memory().unwrap();
        store.persist(&sample(AuditType::LOGIN_SUCCESS, "a")).unwrap();
        store.persist(&sample(AuditType::LOGIN_SUCCESS, "b")).unwrap();
        store
            .persist(&sample(AuditType::LOGIN_FAILURE, "c").with_level(AuditLevel::Warning))
            .unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.by_type["login.success"], 2);
        assert_eq!(stats.by_level["warning"], 1);
        assert_eq!(stats.by_level["info"], 2);
    }

    #[test]
    fn test_cleanup_removes_expired() {
        let store = SqliteStore::in_memory().unwrap();
        let old = sample(AuditType::ENTITY_UPDATED, "old")
            .with_timestamp(Utc::now() - chrono::Duration::days(120));
        store.persist(&old).unwrap();
        store.persist(&sample(AuditType::ENTITY_UPDATED, "new")).unwrap();

        assert_eq!(store.cleanup(90).unwrap(), 1);
        assert_eq!(store.count().unwrap(), 1);
        assert!(store.get(&old.id).unwrap().is_none());
    }

    #[test]
    fn test_cleanup_rejects_out_of_range_days() {
        let store = SqliteStore::in_memory().unwrap();
        store.persist(&sample(AuditType::ENTITY_UPDATED, "alice")).unwrap();

        assert!(matches!(store.cleanup(u32::MAX), Err(Error::InvalidInput(_))));

        // 저장소는 그대로 사용 가능
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.cleanup(90).unwrap(), 0);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.db");

        let store = SqliteStore::open(&path).unwrap();
        store.persist(&sample(AuditType::LOGIN_SUCCESS, "alice")).unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
