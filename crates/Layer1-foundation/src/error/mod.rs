//! Error types for EasyAudit
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// EasyAudit 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 저장소 관련
    // ========================================================================
    #[error("Storage error: {0}")]
    Storage(String),

    /// 대기 중인 삭제 로그를 비우다가 중간에 실패
    ///
    /// `persisted`개는 이미 저장되었고 `remaining`개는 버퍼에 남아 있습니다.
    #[error("Pending log drain failed after {persisted} record(s), {remaining} remaining: {source}")]
    PartialDrain {
        persisted: usize,
        remaining: usize,
        #[source]
        source: Box<Error>,
    },

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 저장 실패 계열 에러인지 확인
    ///
    /// 호출자(이벤트 소스)가 작업 단위 전체를 재시도할지 판단할 때 사용합니다.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            Error::Storage(_) | Error::Sqlite(_) | Error::PartialDrain { .. }
        )
    }

    /// 버퍼 드레인 실패 생성 헬퍼
    pub fn partial_drain(persisted: usize, remaining: usize, source: Error) -> Self {
        Error::PartialDrain {
            persisted,
            remaining,
            source: Box::new(source),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
