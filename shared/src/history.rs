//! Batch history reconstruction
//!
//! The persistence service returns a lot's lineage with every sac-numbered
//! sub-lot listed on its own. This module folds sibling sub-lots produced
//! by the same transformation back into one group per parent lot number.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{LotGroup, StockOrder, TimelineEntry, TimelineEvent};

/// Group sibling sub-lots in every entry of a raw timeline
pub fn group_timeline(timeline: Vec<TimelineEntry>) -> Vec<TimelineEntry> {
    timeline
        .into_iter()
        .map(|mut entry| {
            if let Some(event) = entry.processing_order.take() {
                entry.processing_order = Some(group_event(event));
            }
            entry
        })
        .collect()
}

/// Fold the sac-numbered target lots of one transformation into groups.
///
/// Only events with more than one target lot are touched. Lots whose
/// internal lot number carries no `/` suffix stay in `target_lots`.
pub fn group_event(mut event: TimelineEvent) -> TimelineEvent {
    if event.target_lots.len() <= 1 {
        return event;
    }

    // buckets in first-seen order
    let mut keys: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<StockOrder>> = HashMap::new();
    let mut ungrouped = Vec::new();

    for lot in event.target_lots.drain(..) {
        match lot.sac_group_key().map(str::to_string) {
            Some(key) => {
                if !buckets.contains_key(&key) {
                    keys.push(key.clone());
                }
                buckets.entry(key).or_default().push(lot);
            }
            None => ungrouped.push(lot),
        }
    }

    let groups = keys.into_iter().filter_map(|key| {
        let members = buckets.remove(&key)?;
        build_group(key, &members)
    });

    event.target_groups.extend(groups);
    event.target_lots = ungrouped;
    event
}

fn build_group(group_key: String, members: &[StockOrder]) -> Option<LotGroup> {
    let first = members.first()?;
    let summed_quantity = members
        .iter()
        .fold(Decimal::ZERO, |acc, lot| acc + lot.net_quantity());

    Some(LotGroup {
        group_key,
        facility_id: first.facility_id,
        measure_unit: first.measure_unit.clone(),
        production_date: first.production_date,
        summed_quantity,
        member_ids: members.iter().map(|lot| lot.id).collect(),
    })
}

/// Number of lots an entry shows once grouped: groups count once each
pub fn displayed_lot_count(event: &TimelineEvent) -> usize {
    event.target_lots.len() + event.target_groups.len()
}
