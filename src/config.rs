use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::stats::{ScoreRestrictions, ScoreStatType, StatTypeRegistry, StatsError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid GC_BIND_ADDR {0}")]
    BindAddr(String),

    #[error("Invalid GC_SCORE_TYPES entry {entry:?}: {reason}")]
    ScoreType { entry: String, reason: String },
}

/// Extra score counter registered from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTypeConfig {
    pub id: String,
    pub name: String,
    pub restrictions: ScoreRestrictions,
}

/// Process configuration, read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub seed_file: Option<PathBuf>,
    pub score_types: Vec<ScoreTypeConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("GC_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| ConfigError::BindAddr(bind_addr.clone()))?;

        let seed_file = lookup("GC_SEED_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let score_types = match lookup("GC_SCORE_TYPES") {
            Some(raw) => parse_score_types(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            bind_addr,
            seed_file,
            score_types,
        })
    }

    /// Default plugins plus the configured score counters.
    pub fn build_registry(&self) -> Result<StatTypeRegistry, StatsError> {
        self.score_types
            .iter()
            .fold(StatTypeRegistry::builder(), |builder, score_type| {
                builder.with_stat_type(Arc::new(
                    ScoreStatType::new(score_type.id.clone(), score_type.name.clone())
                        .with_restrictions(score_type.restrictions),
                ))
            })
            .build()
    }
}

/// Parses `id:Name[:min[:max]]` entries separated by commas. Empty bounds mean unbounded.
fn parse_score_types(raw: &str) -> Result<Vec<ScoreTypeConfig>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_score_type)
        .collect()
}

fn parse_score_type(entry: &str) -> Result<ScoreTypeConfig, ConfigError> {
    let invalid = |reason: &str| ConfigError::ScoreType {
        entry: entry.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 4 {
        return Err(invalid("expected id:Name[:min[:max]]"));
    }
    if parts[0].is_empty() || parts[1].is_empty() {
        return Err(invalid("id and name are required"));
    }

    let bound = |index: usize| -> Result<Option<i64>, ConfigError> {
        match parts.get(index) {
            None => Ok(None),
            Some(text) if text.is_empty() => Ok(None),
            Some(text) => text
                .parse()
                .map(Some)
                .map_err(|_| invalid("bounds must be integers")),
        }
    };
    let restrictions = ScoreRestrictions {
        min: bound(2)?,
        max: bound(3)?,
    };
    if let (Some(min), Some(max)) = (restrictions.min, restrictions.max) {
        if min > max {
            return Err(invalid("min is greater than max"));
        }
    }

    Ok(ScoreTypeConfig {
        id: parts[0].to_string(),
        name: parts[1].to_string(),
        restrictions,
    })
}
