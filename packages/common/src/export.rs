//! Two-section CSV export of event results.
//!
//! Section one holds one summary row per team in rank order. After a blank
//! line and a title line, section two holds one detail row per evaluation.
//! Header texts and column order are consumed by spreadsheets and must not
//! change.

use chrono::NaiveDate;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, StringRecordsIter, Terminator, WriterBuilder};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::scoring::{EvaluationRecord, TeamRanking};

pub const SUMMARY_HEADER: [&str; 9] = [
    "Rank",
    "Team Number",
    "Team Leader",
    "Judges Count",
    "Skit Exec (Avg)",
    "Slogan (Avg)",
    "Coord (Avg)",
    "Total Score",
    "Status",
];

pub const DETAIL_SECTION_TITLE: &str = "Detailed Evaluations";

pub const DETAIL_HEADER: [&str; 11] = [
    "Team Number",
    "Team Name",
    "Judge Name",
    "Skit Execution",
    "Slogan/Jingle",
    "Team Coordination",
    "Total Score",
    "Offensive Content",
    "Original Content",
    "Time Limit Followed",
    "Submitted At",
];

const SUBMITTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Flush(String),
    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("malformed export: {0}")]
    Malformed(String),
}

/// Render rankings and the raw evaluation list as spreadsheet-ready CSV.
pub fn write_results(
    rankings: &[TeamRanking],
    evaluations: &[EvaluationRecord],
) -> Result<String, ExportError> {
    let mut out = String::new();

    out.push_str(&header_line(&SUMMARY_HEADER));
    let summary_rows = rankings.iter().map(|r| {
        vec![
            r.rank.to_string(),
            r.team_number.to_string(),
            r.team_leader.clone(),
            r.judges_count.to_string(),
            format!("{:.1}", r.avg_skit_execution),
            format!("{:.1}", r.avg_slogan_jingle),
            format!("{:.1}", r.avg_team_coordination),
            r.final_score.to_string(),
            if r.has_offensive_content {
                "Flagged"
            } else {
                "Clean"
            }
            .to_string(),
        ]
    });
    out.push_str(&write_rows(summary_rows)?);

    out.push('\n');
    out.push_str(DETAIL_SECTION_TITLE);
    out.push('\n');

    out.push_str(&header_line(&DETAIL_HEADER));
    let detail_rows = evaluations.iter().map(|e| {
        vec![
            e.team_number.to_string(),
            e.team_leader.clone(),
            e.judge_name.clone(),
            e.skit_execution.to_string(),
            e.slogan_jingle.to_string(),
            e.team_coordination.to_string(),
            e.total_score.to_string(),
            yes_no(e.offensive_content).to_string(),
            yes_no(e.original_content).to_string(),
            yes_no(e.time_limit_followed).to_string(),
            e.created_at.format(SUBMITTED_AT_FORMAT).to_string(),
        ]
    });
    out.push_str(&write_rows(detail_rows)?);

    Ok(out)
}

/// Download name for an export produced on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("judging_results_{}.csv", date.format("%Y-%m-%d"))
}

fn header_line(columns: &[&str]) -> String {
    let mut line = columns.join(",");
    line.push('\n');
    line
}

/// Data rows quote every non-numeric field; headers are written verbatim.
fn write_rows(rows: impl Iterator<Item = Vec<String>>) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::NonNumeric)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// A summary row read back from an export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Team Number")]
    pub team_number: i32,
    #[serde(rename = "Team Leader")]
    pub team_leader: String,
    #[serde(rename = "Judges Count")]
    pub judges_count: usize,
    #[serde(rename = "Skit Exec (Avg)")]
    pub avg_skit_execution: f64,
    #[serde(rename = "Slogan (Avg)")]
    pub avg_slogan_jingle: f64,
    #[serde(rename = "Coord (Avg)")]
    pub avg_team_coordination: f64,
    #[serde(rename = "Total Score")]
    pub final_score: i64,
    #[serde(rename = "Status", deserialize_with = "flagged_clean")]
    pub flagged: bool,
}

/// A detail row read back from an export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetailRow {
    #[serde(rename = "Team Number")]
    pub team_number: i32,
    #[serde(rename = "Team Name")]
    pub team_name: String,
    #[serde(rename = "Judge Name")]
    pub judge_name: String,
    #[serde(rename = "Skit Execution")]
    pub skit_execution: i32,
    #[serde(rename = "Slogan/Jingle")]
    pub slogan_jingle: i32,
    #[serde(rename = "Team Coordination")]
    pub team_coordination: i32,
    #[serde(rename = "Total Score")]
    pub total_score: i32,
    #[serde(rename = "Offensive Content", deserialize_with = "yes_no_flag")]
    pub offensive_content: bool,
    #[serde(rename = "Original Content", deserialize_with = "yes_no_flag")]
    pub original_content: bool,
    #[serde(rename = "Time Limit Followed", deserialize_with = "yes_no_flag")]
    pub time_limit_followed: bool,
    #[serde(rename = "Submitted At")]
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResults {
    pub summary: Vec<SummaryRow>,
    pub details: Vec<DetailRow>,
}

/// Parse an export produced by [`write_results`].
///
/// Both sections are read in one CSV pass, so quoted fields may contain line
/// breaks or even the section title without ending the summary early.
pub fn parse_results(text: &str) -> Result<ParsedResults, ExportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let summary_header = expect_header(&mut records, &SUMMARY_HEADER)?;
    let mut summary: Vec<SummaryRow> = Vec::new();
    let mut found_title = false;
    for record in records.by_ref() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        if record.len() == 1 && &record[0] == DETAIL_SECTION_TITLE {
            found_title = true;
            break;
        }
        summary.push(record.deserialize(Some(&summary_header))?);
    }
    if !found_title {
        return Err(ExportError::Malformed(format!(
            "missing '{DETAIL_SECTION_TITLE}' section"
        )));
    }

    let detail_header = expect_header(&mut records, &DETAIL_HEADER)?;
    let mut details: Vec<DetailRow> = Vec::new();
    for record in records {
        let record = record?;
        if !is_blank(&record) {
            details.push(record.deserialize(Some(&detail_header))?);
        }
    }

    Ok(ParsedResults { summary, details })
}

fn expect_header<R: std::io::Read>(
    records: &mut StringRecordsIter<'_, R>,
    columns: &[&str],
) -> Result<StringRecord, ExportError> {
    let header = records
        .next()
        .transpose()?
        .ok_or_else(|| ExportError::Malformed("export ended before a header line".into()))?;
    if !header.iter().eq(columns.iter().copied()) {
        return Err(ExportError::Malformed(format!(
            "unexpected header line: {}",
            header.iter().collect::<Vec<_>>().join(",")
        )));
    }
    Ok(header)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn flagged_clean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match String::deserialize(deserializer)?.as_str() {
        "Flagged" => Ok(true),
        "Clean" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected Flagged or Clean, got {other}"
        ))),
    }
}

fn yes_no_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match String::deserialize(deserializer)?.as_str() {
        "Yes" => Ok(true),
        "No" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected Yes or No, got {other}"
        ))),
    }
}
