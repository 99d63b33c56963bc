use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 來源中的一行，行號從 1 開始
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub line_number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(rename = "line")]
    pub line_number: usize,
    pub input: String,
    pub normalized: String,
    pub plausible_email: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_lines: usize,
    pub processed: usize,
    pub skipped_blank: usize,
    pub plausible_emails: usize,
    pub longest_normalized: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<TextRecord>,
    pub summary: BatchSummary,
}
