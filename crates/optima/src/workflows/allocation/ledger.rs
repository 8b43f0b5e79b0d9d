use std::collections::{BTreeMap, HashMap};

use super::domain::{Category, Position, PositionId};

/// Raised when a caller tries to take a seat that is not there.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invariant violation: no {category} seat left on position {position_id}")]
    InvariantViolation {
        position_id: PositionId,
        category: Category,
    },
}

/// Remaining reserved seats per position and category for a single run.
///
/// Counters start at each position's reservation and only ever go down.
#[derive(Debug, Clone, Default)]
pub struct QuotaLedger {
    remaining: HashMap<PositionId, BTreeMap<Category, u32>>,
}

impl QuotaLedger {
    pub fn initialize(positions: &[Position]) -> Self {
        let remaining = positions
            .iter()
            .map(|position| (position.id.clone(), position.reservations.clone()))
            .collect();
        Self { remaining }
    }

    pub fn has_room(&self, position_id: &PositionId, category: Category) -> bool {
        self.remaining(position_id, category) > 0
    }

    pub fn remaining(&self, position_id: &PositionId, category: Category) -> u32 {
        self.remaining
            .get(position_id)
            .and_then(|counters| counters.get(&category))
            .copied()
            .unwrap_or(0)
    }

    /// Take one seat, returning how many remain afterwards.
    pub fn consume(
        &mut self,
        position_id: &PositionId,
        category: Category,
    ) -> Result<u32, LedgerError> {
        let slot = self
            .remaining
            .get_mut(position_id)
            .and_then(|counters| counters.get_mut(&category))
            .filter(|seats| **seats > 0)
            .ok_or_else(|| LedgerError::InvariantViolation {
                position_id: position_id.clone(),
                category,
            })?;
        *slot -= 1;
        Ok(*slot)
    }
}
