use super::super::domain::{Candidate, Position};
use super::config::ScoringWeights;
use super::{ScoreComponent, ScoreTerm};

/// Case-insensitive substring containment in either direction. Blank values never match.
pub(crate) fn fuzzy_contains(left: &str, right: &str) -> bool {
    let left = left.trim().to_lowercase();
    let right = right.trim().to_lowercase();
    if left.is_empty() || right.is_empty() {
        return false;
    }
    left.contains(&right) || right.contains(&left)
}

/// Comma separated tags, trimmed and lower-cased, blanks dropped, first occurrence kept.
pub(crate) fn normalize_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',') {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

pub(crate) fn score_terms(
    candidate: &Candidate,
    position: &Position,
    weights: &ScoringWeights,
) -> Vec<ScoreComponent> {
    let mut components = Vec::new();

    if fuzzy_contains(&candidate.location_pref, &position.location) {
        components.push(ScoreComponent {
            term: ScoreTerm::Location,
            points: weights.location,
            note: "Location match".to_string(),
        });
    }

    if fuzzy_contains(&candidate.sector_pref, &position.sector) {
        components.push(ScoreComponent {
            term: ScoreTerm::Sector,
            points: weights.sector,
            note: "Sector match".to_string(),
        });
    }

    if let Some(component) = skill_component(candidate, position, weights) {
        components.push(component);
    }

    // Adding positive zero turns -0.0 into 0.0 so the note never reads "-0%".
    let merit = candidate.merit + 0.0;
    let merit_points = if weights.merit_max > 0.0 {
        (merit / weights.merit_max) * weights.merit
    } else {
        0.0
    };
    components.push(ScoreComponent {
        term: ScoreTerm::Merit,
        points: merit_points,
        note: format!("Merit: {merit}%"),
    });

    components
}

fn skill_component(
    candidate: &Candidate,
    position: &Position,
    weights: &ScoringWeights,
) -> Option<ScoreComponent> {
    let required = normalize_tags(&position.required_skills);
    if required.is_empty() {
        return None;
    }

    let matches = normalize_tags(&candidate.skills)
        .iter()
        .filter(|skill| {
            required
                .iter()
                .any(|tag| tag.contains(skill.as_str()) || skill.contains(tag.as_str()))
        })
        .count();
    if matches == 0 {
        return None;
    }

    let points = ((matches as f64 / required.len() as f64) * weights.skills).min(weights.skills);
    Some(ScoreComponent {
        term: ScoreTerm::Skills,
        points,
        note: format!("{matches} skill matches"),
    })
}
