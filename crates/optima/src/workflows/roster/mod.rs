mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::allocation::{
    AllocationGuard, Candidate, CandidateId, Position, PositionId, ValidationError,
};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Invalid { line: u64, source: ValidationError },
    Roster(ValidationError),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Invalid { line, source } => {
                write!(f, "roster row on line {} rejected: {}", line, source)
            }
            RosterImportError::Roster(err) => write!(f, "roster rejected: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Invalid { source, .. } => Some(source),
            RosterImportError::Roster(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Validated candidate and position lists, in file order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub candidates: Vec<Candidate>,
    pub positions: Vec<Position>,
}

/// Loads rosters from CSV exports shaped like the intake tables.
///
/// Candidates: `id,name,marks,skills,category,location_pref,sector_pref`.
/// Positions: `id,company,role,location,sector,required_skills,total_positions,`
/// followed by `quota_gen,quota_sc,quota_st,quota_obc,quota_ews`. A blank `id` gets a
/// line-derived identifier.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_paths<C: AsRef<Path>, P: AsRef<Path>>(
        candidates: C,
        positions: P,
    ) -> Result<Roster, RosterImportError> {
        let candidates = Self::candidates_from_reader(std::fs::File::open(candidates)?)?;
        let positions = Self::positions_from_reader(std::fs::File::open(positions)?)?;
        Self::assemble(candidates, positions)
    }

    pub fn from_readers<C: Read, P: Read>(
        candidates: C,
        positions: P,
    ) -> Result<Roster, RosterImportError> {
        let candidates = Self::candidates_from_reader(candidates)?;
        let positions = Self::positions_from_reader(positions)?;
        Self::assemble(candidates, positions)
    }

    pub fn candidates_from_reader<R: Read>(reader: R) -> Result<Vec<Candidate>, RosterImportError> {
        let guard = AllocationGuard;
        parser::parse_candidates(reader)?
            .into_iter()
            .map(|row| {
                let line = row.line;
                guard
                    .candidate_from_submission(row.submission, || {
                        CandidateId(format!("candidate-line-{line}"))
                    })
                    .map_err(|source| RosterImportError::Invalid { line, source })
            })
            .collect()
    }

    pub fn positions_from_reader<R: Read>(reader: R) -> Result<Vec<Position>, RosterImportError> {
        let guard = AllocationGuard;
        parser::parse_positions(reader)?
            .into_iter()
            .map(|row| {
                let line = row.line;
                guard
                    .position_from_submission(row.submission, || {
                        PositionId(format!("position-line-{line}"))
                    })
                    .map_err(|source| RosterImportError::Invalid { line, source })
            })
            .collect()
    }

    fn assemble(
        candidates: Vec<Candidate>,
        positions: Vec<Position>,
    ) -> Result<Roster, RosterImportError> {
        AllocationGuard
            .validate_roster(&candidates, &positions)
            .map_err(RosterImportError::Roster)?;
        Ok(Roster {
            candidates,
            positions,
        })
    }
}
