use crate::engine::types::ExecutionError;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Sentinel exam value meaning "every exam".
pub const ALL_EXAMS: &str = "ALL";

/// Date format accepted for `start_date` / `end_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shape check run before chrono, which on its own tolerates padding and signed years.
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$").expect("valid date regex"));

/// A calendar date together with the exact string the caller sent.
///
/// `date` feeds the query; `raw` is what gets echoed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDate {
    pub date: NaiveDate,
    pub raw: String,
}

impl CalendarDate {
    /// Accepts `YYYY-MM-DD` (month and day may be one digit) naming a real calendar day.
    pub fn parse(raw: &str) -> Option<Self> {
        if !DATE_SHAPE.is_match(raw) {
            return None;
        }
        let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?;
        Some(Self {
            date,
            raw: raw.to_string(),
        })
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Which exams a ranking covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamFilter {
    All,
    Exam(String),
}

impl ExamFilter {
    /// Accepts `ALL` or a member of `exams`. Matching is case-sensitive.
    pub fn parse(raw: &str, exams: &[String]) -> Option<Self> {
        if raw == ALL_EXAMS {
            return Some(ExamFilter::All);
        }
        exams
            .iter()
            .any(|exam| exam == raw)
            .then(|| ExamFilter::Exam(raw.to_string()))
    }
}

impl fmt::Display for ExamFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamFilter::All => f.write_str(ALL_EXAMS),
            ExamFilter::Exam(code) => f.write_str(code),
        }
    }
}

impl Serialize for ExamFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Raw inbound parameters, exactly as the caller sent them.
///
/// Every field is optional so that a missing field reaches validation and is
/// answered with the error envelope instead of a transport-level rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingParams {
    #[serde(default)]
    pub exam: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl RankingParams {
    pub fn new(exam: &str, start_date: &str, end_date: &str) -> Self {
        Self {
            exam: Some(exam.to_string()),
            start_date: Some(start_date.to_string()),
            end_date: Some(end_date.to_string()),
        }
    }
}

/// A validated ranking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRequest {
    pub exam: ExamFilter,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
}

/// One line of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position, taken from the engine's row order.
    pub rank: usize,
    pub name: String,
    /// Summed score exactly as the engine rendered it.
    pub score: String,
}

/// The envelope returned to callers.
///
/// Serializes to `{"result":"success", ...}` or `{"result":"error"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum RankingResponse {
    Success {
        start_date: CalendarDate,
        end_date: CalendarDate,
        exam: ExamFilter,
        ranking: Vec<RankedEntry>,
    },
    Error,
}

impl RankingResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, RankingResponse::Success { .. })
    }

    pub fn ranking(&self) -> &[RankedEntry] {
        match self {
            RankingResponse::Success { ranking, .. } => ranking,
            RankingResponse::Error => &[],
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("missing or empty field: {0}")]
    MissingField(&'static str),

    #[error("unknown exam: {0}")]
    UnknownExam(String),

    #[error("{field} is not a YYYY-MM-DD date: {value}")]
    InvalidDate { field: &'static str, value: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("result row {row} has no value in column {column}")]
    MissingCell { row: usize, column: usize },
}

/// Every way a ranking request can fail. All of them reach the caller as `{"result":"error"}`.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("query execution failed: {0}")]
    Execution(#[from] ExecutionError),

    #[error("malformed result set: {0}")]
    Projection(#[from] ProjectionError),
}
