//! 로거 채널 - 로거별로 받아들일 레벨 집합

use crate::audit::AuditLevel;
use crate::{Error, Result};

/// 레벨 채널 필터
///
/// - 빈 목록: 모든 레벨
/// - `["info", "warning"]`: 나열된 레벨만
/// - `["!debug"]`: 나열된 레벨 제외
///
/// 포함/제외 표기를 한 목록에 섞을 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelFilter {
    All,
    Only(Vec<AuditLevel>),
    Except(Vec<AuditLevel>),
}

impl Default for ChannelFilter {
    fn default() -> Self {
        Self::All
    }
}

impl ChannelFilter {
    pub fn all() -> Self {
        Self::All
    }

    pub fn only(levels: impl IntoIterator<Item = AuditLevel>) -> Self {
        Self::Only(levels.into_iter().collect())
    }

    pub fn except(levels: impl IntoIterator<Item = AuditLevel>) -> Self {
        Self::Except(levels.into_iter().collect())
    }

    /// 설정 문자열 목록 파싱
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        if entries.is_empty() {
            return Ok(Self::All);
        }

        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for entry in entries {
            let entry = entry.as_ref().trim();
            match entry.strip_prefix('!') {
                Some(level) => exclude.push(level.parse::<AuditLevel>()?),
                None => include.push(entry.parse::<AuditLevel>()?),
            }
        }

        match (include.is_empty(), exclude.is_empty()) {
            (false, true) => Ok(Self::Only(include)),
            (true, false) => Ok(Self::Except(exclude)),
            _ => Err(Error::Config(
                "Cannot mix included and excluded levels in one channel".to_string(),
            )),
        }
    }

    /// 레벨 허용 여부
    pub fn accepts(&self, level: AuditLevel) -> bool {
        match self {
            Self::All => true,
            Self::Only(levels) => levels.contains(&level),
            Self::Except(levels) => !levels.contains(&level),
        }
    }
}
