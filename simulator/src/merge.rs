//! Places results by composite id.

use crate::SimulationError;
use letitride_types::UnitResult;

/// Pre-sized, direct-index result collection. Order depends only on composite
/// ids, never on which worker delivered a result or when.
pub struct ResultMerger {
    slots: Vec<Option<UnitResult>>,
}

impl ResultMerger {
    pub fn new(units: u64, seats_per_unit: u64) -> Self {
        let len = units.saturating_mul(seats_per_unit) as usize;
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn place(&mut self, composite_id: u64, result: UnitResult) -> Result<(), SimulationError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(composite_id as usize)
            .ok_or_else(|| {
                SimulationError::Merge(format!(
                    "composite id {composite_id} out of range (expected < {len})"
                ))
            })?;
        if slot.is_some() {
            return Err(SimulationError::Merge(format!(
                "composite id {composite_id} placed twice"
            )));
        }
        *slot = Some(result);
        Ok(())
    }

    /// Ordered results. Fails if any slot was never filled.
    pub fn finish(self) -> Result<Vec<UnitResult>, SimulationError> {
        let mut results = Vec::with_capacity(self.slots.len());
        for (composite_id, slot) in self.slots.into_iter().enumerate() {
            match slot {
                Some(result) => results.push(result),
                None => {
                    return Err(SimulationError::Merge(format!(
                        "missing result for composite id {composite_id}"
                    )))
                }
            }
        }
        Ok(results)
    }
}
