use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::workflows::allocation::{CandidateSubmission, Category, PositionSubmission};

/// A parsed row tagged with its 1-based line number in the source file.
#[derive(Debug)]
pub(crate) struct RosterRow<T> {
    pub(crate) line: u64,
    pub(crate) submission: T,
}

pub(crate) fn parse_candidates<R: Read>(
    reader: R,
) -> Result<Vec<RosterRow<CandidateSubmission>>, csv::Error> {
    parse_rows::<R, CandidateRow>(reader)
        .map(|rows| rows.into_iter().map(|row| row.map(Into::into)).collect())
}

pub(crate) fn parse_positions<R: Read>(
    reader: R,
) -> Result<Vec<RosterRow<PositionSubmission>>, csv::Error> {
    parse_rows::<R, PositionRow>(reader)
        .map(|rows| rows.into_iter().map(|row| row.map(Into::into)).collect())
}

impl<T> RosterRow<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> RosterRow<U> {
        RosterRow {
            line: self.line,
            submission: f(self.submission),
        }
    }
}

fn parse_rows<R, T>(reader: R) -> Result<Vec<RosterRow<T>>, csv::Error>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or_default();
        let submission = record.deserialize(Some(&headers))?;
        rows.push(RosterRow { line, submission });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    name: String,
    marks: f64,
    skills: String,
    category: String,
    location_pref: String,
    sector_pref: String,
}

impl From<CandidateRow> for CandidateSubmission {
    fn from(row: CandidateRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            merit: row.marks,
            skills: row.skills,
            category: row.category,
            location_pref: row.location_pref,
            sector_pref: row.sector_pref,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PositionRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    company: String,
    role: String,
    location: String,
    sector: String,
    required_skills: String,
    total_positions: i64,
    #[serde(default, deserialize_with = "blank_count_as_zero")]
    quota_gen: i64,
    #[serde(default, deserialize_with = "blank_count_as_zero")]
    quota_sc: i64,
    #[serde(default, deserialize_with = "blank_count_as_zero")]
    quota_st: i64,
    #[serde(default, deserialize_with = "blank_count_as_zero")]
    quota_obc: i64,
    #[serde(default, deserialize_with = "blank_count_as_zero")]
    quota_ews: i64,
}

impl From<PositionRow> for PositionSubmission {
    fn from(row: PositionRow) -> Self {
        let reservations = [
            (Category::General, row.quota_gen),
            (Category::ScheduledCaste, row.quota_sc),
            (Category::ScheduledTribe, row.quota_st),
            (Category::OtherBackwardClass, row.quota_obc),
            (Category::EconomicallyWeaker, row.quota_ews),
        ]
        .into_iter()
        .map(|(category, seats)| (category.code().to_string(), seats))
        .collect::<BTreeMap<_, _>>();

        Self {
            id: row.id,
            organization: row.company,
            role: row.role,
            required_skills: row.required_skills,
            location: row.location,
            sector: row.sector,
            total_seats: row.total_positions,
            reservations,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn blank_count_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<i64>().map_err(serde::de::Error::custom)
}
