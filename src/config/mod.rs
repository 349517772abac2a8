//! Service Configuration
//!
//! Everything that used to be a process-wide constant (target table, output location,
//! exam list, retry budget) is loaded once at startup and handed to the components
//! that need it.
//!
//! Values come from `RANKING_*` environment variables; unset variables fall back to
//! the defaults below.

use crate::engine::types::PollConfig;
use crate::ranking::query::QueryTarget;

use anyhow::{Context, Result};
use regex::Regex;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:9000";
pub const DEFAULT_DATABASE: &str = "dev_techstock";
pub const DEFAULT_TABLE: &str = "scores";
pub const DEFAULT_OUTPUT_LOCATION: &str = "s3://mito-bucket/test-json/results/";
pub const DEFAULT_ENGINE_TIMEOUT_MS: u64 = 10_000;

/// Exam codes accepted besides `ALL`.
pub const DEFAULT_EXAMS: &[&str] = &[
    "SAA", "SOA", "SAP", "CLF", "DVA", "DOP", "ANS", "SCS", "DAS", "MLS", "DBS", "PAS", "CDL",
    "ACE", "PCA",
];

static SQL_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

static EXAM_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]+$").expect("valid exam code regex"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Base URL of the query gateway.
    pub engine_url: String,
    /// Per-request timeout for calls to the gateway.
    pub engine_timeout: Duration,
    pub target: QueryTarget,
    pub exams: Vec<String>,
    pub poll: PollConfig,
}

impl AppConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = parse_var("RANKING_BIND", &var("RANKING_BIND", DEFAULT_BIND))?;

        let engine_url = var("RANKING_ENGINE_URL", DEFAULT_ENGINE_URL)
            .trim_end_matches('/')
            .to_string();
        let engine_timeout = Duration::from_millis(parse_var(
            "RANKING_ENGINE_TIMEOUT_MS",
            &var("RANKING_ENGINE_TIMEOUT_MS", &DEFAULT_ENGINE_TIMEOUT_MS.to_string()),
        )?);

        let target = QueryTarget {
            database: identifier("RANKING_DATABASE", var("RANKING_DATABASE", DEFAULT_DATABASE))?,
            table: identifier("RANKING_TABLE", var("RANKING_TABLE", DEFAULT_TABLE))?,
            output_location: var("RANKING_OUTPUT_LOCATION", DEFAULT_OUTPUT_LOCATION),
        };

        let exams = match lookup("RANKING_EXAMS") {
            Some(list) => parse_exam_list(&list)?,
            None => DEFAULT_EXAMS.iter().map(|e| e.to_string()).collect(),
        };

        let defaults = PollConfig::default();
        let max_attempts: u32 = match lookup("RANKING_MAX_ATTEMPTS") {
            Some(raw) => parse_var("RANKING_MAX_ATTEMPTS", &raw)?,
            None => defaults.max_attempts,
        };
        if max_attempts == 0 {
            anyhow::bail!("RANKING_MAX_ATTEMPTS must be at least 1");
        }
        let base_delay = match lookup("RANKING_BASE_DELAY_MS") {
            Some(raw) => Duration::from_millis(parse_var("RANKING_BASE_DELAY_MS", &raw)?),
            None => defaults.base_delay,
        };

        Ok(Self {
            bind_addr,
            engine_url,
            engine_timeout,
            target,
            exams,
            poll: PollConfig {
                max_attempts,
                base_delay,
            },
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid value for {}: {:?}", key, raw))
}

/// Database and table names are written into the SQL text, so they must be bare identifiers.
fn identifier(key: &str, value: String) -> Result<String> {
    if !SQL_IDENTIFIER.is_match(&value) {
        anyhow::bail!("{} must be a plain SQL identifier, got {:?}", key, value);
    }
    Ok(value)
}

/// Comma-separated exam codes, e.g. `SAA, SOA,DVA`.
fn parse_exam_list(raw: &str) -> Result<Vec<String>> {
    let mut exams = Vec::new();

    for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if !EXAM_CODE.is_match(code) {
            anyhow::bail!("invalid exam code in RANKING_EXAMS: {:?}", code);
        }
        if !exams.iter().any(|e| e == code) {
            exams.push(code.to_string());
        }
    }

    if exams.is_empty() {
        anyhow::bail!("RANKING_EXAMS must list at least one exam code");
    }
    Ok(exams)
}
