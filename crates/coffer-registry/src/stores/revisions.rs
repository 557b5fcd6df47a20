//! Append-only revision history store
//!
//! Keyed by `(asset, generation, iteration)`. Each enrollment of an asset id
//! opens a new generation, so an id that is retired and enrolled again starts
//! over at iteration 1 while earlier generations stay readable. Within one
//! generation iterations form the dense sequence `1..=n`. Recorded entries
//! are never overwritten or removed.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use coffer_core::AssetId;

use crate::records::RevisionRecord;

type HistoryKey = (AssetId, u32, u32);

/// Every recorded revision of every asset, live or retired
#[derive(Debug, Clone, Default)]
pub struct RevisionHistory {
    records: BTreeMap<HistoryKey, RevisionRecord>,
}

impl RevisionHistory {
    /// Most recent generation recorded for an asset id
    pub fn current_generation(&self, asset: &AssetId) -> Option<u32> {
        self.records
            .range((asset.clone(), 0, 0)..=(asset.clone(), u32::MAX, u32::MAX))
            .next_back()
            .map(|((_, generation, _), _)| *generation)
    }

    /// Generation the next enrollment of `asset` opens
    pub fn next_generation(&self, asset: &AssetId) -> u32 {
        self.current_generation(asset)
            .map_or(0, |generation| generation.saturating_add(1))
    }

    /// Look up one iteration of the current generation
    pub fn get(&self, asset: &AssetId, iteration: u32) -> Option<&RevisionRecord> {
        let generation = self.current_generation(asset)?;
        self.get_in(asset, generation, iteration)
    }

    /// Look up one iteration of a specific generation
    pub fn get_in(
        &self,
        asset: &AssetId,
        generation: u32,
        iteration: u32,
    ) -> Option<&RevisionRecord> {
        self.records.get(&(asset.clone(), generation, iteration))
    }

    /// Iterations of the current generation in ascending order
    pub fn history<'a>(
        &'a self,
        asset: &AssetId,
    ) -> impl DoubleEndedIterator<Item = (u32, &'a RevisionRecord)> + 'a {
        let generation = self.current_generation(asset).unwrap_or(0);
        self.history_in(asset, generation)
    }

    /// Iterations of one generation in ascending order
    pub fn history_in<'a>(
        &'a self,
        asset: &AssetId,
        generation: u32,
    ) -> impl DoubleEndedIterator<Item = (u32, &'a RevisionRecord)> + 'a {
        self.records
            .range((asset.clone(), generation, 1)..=(asset.clone(), generation, u32::MAX))
            .map(|((_, _, iteration), record)| (*iteration, record))
    }

    /// Highest iteration of the current generation
    pub fn latest_iteration(&self, asset: &AssetId) -> Option<u32> {
        self.history(asset).next_back().map(|(iteration, _)| iteration)
    }

    /// Highest iteration of one generation
    pub fn latest_in(&self, asset: &AssetId, generation: u32) -> Option<u32> {
        self.history_in(asset, generation)
            .next_back()
            .map(|(iteration, _)| iteration)
    }

    /// Whether any iteration has been recorded for an asset id
    pub fn has_history(&self, asset: &AssetId) -> bool {
        self.current_generation(asset).is_some()
    }

    /// Every row in key order as `(asset, generation, iteration, record)`
    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, u32, u32, &RevisionRecord)> {
        self.records
            .iter()
            .map(|((asset, generation, iteration), record)| {
                (asset, *generation, *iteration, record)
            })
    }

    /// Total number of recorded revisions
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record `iteration` of `generation` for `asset`
    ///
    /// Iteration 1 opens the next generation; later iterations extend the
    /// current one by exactly one. An occupied slot is left untouched.
    pub(crate) fn append(
        &mut self,
        asset: AssetId,
        generation: u32,
        iteration: u32,
        record: RevisionRecord,
    ) {
        debug_assert!(
            if iteration == 1 {
                generation == self.next_generation(&asset)
            } else {
                self.current_generation(&asset) == Some(generation)
                    && self.latest_in(&asset, generation) == Some(iteration - 1)
            },
            "revision history must stay dense"
        );
        match self.records.entry((asset, generation, iteration)) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(slot) => {
                tracing::error!(
                    asset_id = %slot.key().0,
                    generation,
                    iteration,
                    "Refused to overwrite recorded revision"
                );
            }
        }
    }
}
