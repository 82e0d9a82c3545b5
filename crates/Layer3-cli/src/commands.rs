//! CLI commands

use anyhow::Context;
use easyaudit_core::{
    AuditListener, AuditLogger, EntitySubscriber, LoggerChain, SharedUserContext, StoreLogger,
    TracingLogger,
};
use easyaudit_foundation::{
    AuditConfig, AuditLevel, AuditQuery, AuditRecord, AuditStore, EventEnvelope, SqliteStore,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 저장소 로거 채널 이름
pub const STORE_LOGGER: &str = "store";
/// tracing 로거 채널 이름 (channels에 정의된 경우에만 사용)
pub const TRACE_LOGGER: &str = "tracing";

// ============================================================================
// ingest
// ============================================================================

pub fn ingest(config: &AuditConfig, file: Option<&Path>) -> anyhow::Result<()> {
    let db_path = config.storage.db_path();
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open audit database {}", db_path.display()))?;

    let users = SharedUserContext::new();
    let logger = build_logger(config, store)?;
    let mut listener = AuditListener::from_config(config, logger, Arc::new(users.clone()))?;
    let subscriber = EntitySubscriber::from_config(config);

    let processed = match file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            ingest_lines(BufReader::new(file), &mut listener, &subscriber, &users)?
        }
        None => ingest_lines(io::stdin().lock(), &mut listener, &subscriber, &users)?,
    };

    println!("Processed {} event(s)", processed);
    Ok(())
}

/// 채널 설정에 따라 로거 체인 구성
fn build_logger<S>(config: &AuditConfig, store: S) -> anyhow::Result<LoggerChain>
where
    S: AuditStore + Send + 'static,
{
    let mut chain = LoggerChain::new();
    chain.push_configured(config, STORE_LOGGER, Box::new(StoreLogger::new(store)))?;
    if config.channels.contains_key(TRACE_LOGGER) {
        chain.push_configured(config, TRACE_LOGGER, Box::new(TracingLogger::new()))?;
    }
    Ok(chain)
}

/// JSON Lines 입력 처리, 끝나면 대기 중인 로그를 플러시
///
/// 중간에 실패해도 플러시는 항상 수행하고, 처리 에러를 먼저 반환합니다.
fn ingest_lines<R, L>(
    reader: R,
    listener: &mut AuditListener<L>,
    subscriber: &EntitySubscriber,
    users: &SharedUserContext,
) -> anyhow::Result<usize>
where
    R: BufRead,
    L: AuditLogger,
{
    let ingested = ingest_each(reader, listener, subscriber, users);
    let flushed = listener.save_pending_logs();

    match (ingested, flushed) {
        (Ok(processed), Ok(())) => Ok(processed),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(flush_error)) => {
            warn!(error = %flush_error, "Failed to save pending logs after ingest error");
            Err(e)
        }
    }
}

fn ingest_each<R, L>(
    reader: R,
    listener: &mut AuditListener<L>,
    subscriber: &EntitySubscriber,
    users: &SharedUserContext,
) -> anyhow::Result<usize>
where
    R: BufRead,
    L: AuditLogger,
{
    let mut processed = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let envelope: EventEnvelope = serde_json::from_str(line)
            .with_context(|| format!("Invalid event on line {}", index + 1))?;

        match envelope.user {
            Some(user) => users.set_user(user),
            None => users.clear(),
        }

        if !subscriber.handle(listener, &envelope.name, &envelope.payload)? {
            listener.on_event(&envelope.payload, &envelope.name)?;
        }
        debug!(event = %envelope.name, "Event ingested");
        processed += 1;
    }

    Ok(processed)
}

// ============================================================================
// list / stats / cleanup
// ============================================================================

pub fn list(
    config: &AuditConfig,
    limit: usize,
    types: Vec<String>,
    actor: Option<String>,
    min_level: Option<&str>,
) -> anyhow::Result<()> {
    let store = SqliteStore::open(config.storage.db_path())?;

    let mut query = AuditQuery::new().with_limit(limit);
    if !types.is_empty() {
        query = query.with_types(types);
    }
    if let Some(actor) = actor {
        query = query.with_actor(actor);
    }
    if let Some(level) = min_level {
        query = query.with_min_level(level.parse::<AuditLevel>()?);
    }

    let records = store.query(&query)?;
    if records.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(())
}

fn format_record(record: &AuditRecord) -> String {
    let actor = match record.actor {
        Some(ref identity) => match identity.impersonator {
            Some(ref by) => format!("{} (via {})", identity.username, by),
            None => identity.username.clone(),
        },
        None => "-".to_string(),
    };

    format!(
        "{} {:<9} {:<22} {:<16} {}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.level.as_str(),
        record.type_id().as_str(),
        actor,
        record.description
    )
}

pub fn stats(config: &AuditConfig) -> anyhow::Result<()> {
    let store = SqliteStore::open(config.storage.db_path())?;
    let stats = store.statistics()?;

    println!("Total records: {}", stats.total_records);
    println!();
    println!("By type:");
    for (type_id, count) in &stats.by_type {
        println!("  {:<24} {}", type_id, count);
    }
    println!();
    println!("By level:");
    for (level, count) in &stats.by_level {
        println!("  {:<24} {}", level, count);
    }
    Ok(())
}

pub fn cleanup(config: &AuditConfig, days: Option<u32>) -> anyhow::Result<()> {
    let store = SqliteStore::open(config.storage.db_path())?;
    let days = days.unwrap_or_else(|| config.storage.retention_days());

    let deleted = store.cleanup(days)?;
    info!(deleted, days, "Retention cleanup finished");
    println!("Deleted {} record(s) older than {} day(s)", deleted, days);
    Ok(())
}
