//! Loot delivery
//!
//! Drains the tracker once per event and merges the result into the host's
//! loot roster. The host builds the roster through more than one code path
//! and may do so repeatedly; delivery is single-use, so every call after the
//! first for an event finds nothing left to hand out.

use kwyd_types::LootSettings;

use crate::host::{CombatEventId, EquippedItem, ItemRoster, RandomSource};

use super::{LootTracker, TrackerState};

/// Result of merging personal loot into a roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// The default loot was cleared by this call
    pub cleared_vanilla: bool,
    /// Items added to the roster
    pub delivered: usize,
}

impl LootTracker {
    /// Hand out the personal loot of `current`, exactly once.
    ///
    /// Returns nothing, and leaves the tracker alone, when `current` is not
    /// the tracked event or nothing was collected. Otherwise the ledger is
    /// consumed: the player-KO veto may discard it whole, the companion-KO
    /// veto is re-checked per entry, and the drop chance thins the rest.
    pub fn drain(
        &mut self,
        current: Option<CombatEventId>,
        settings: &LootSettings,
        rng: &mut dyn RandomSource,
    ) -> Vec<EquippedItem> {
        let Some(current) = current else {
            tracing::debug!("Drain without map event, nothing to deliver");
            return Vec::new();
        };

        let ledger = match &self.state {
            TrackerState::Tracking(ledger) if ledger.event == current => ledger,
            TrackerState::Tracking(ledger) => {
                tracing::debug!(
                    requested = current.0,
                    active = ledger.event.0,
                    "Drain for an event that is not tracked"
                );
                return Vec::new();
            }
            TrackerState::Idle => {
                tracing::debug!(requested = current.0, "Drain while idle, nothing to deliver");
                return Vec::new();
            }
        };

        if ledger.entries.is_empty() {
            tracing::debug!(event = current.0, "No personal items collected");
            return Vec::new();
        }

        if ledger.player_ko_blocks(settings) {
            tracing::debug!(
                event = current.0,
                discarded = ledger.entries.len(),
                "Player was knocked out and loot-on-KO is disabled, discarding personal loot"
            );
            self.reset();
            return Vec::new();
        }

        let TrackerState::Tracking(ledger) = std::mem::take(&mut self.state) else {
            return Vec::new();
        };

        let collected = ledger.entries.len();
        let drop_chance = f64::from(settings.drop_chance_percent());

        let survivors = ledger
            .entries
            .iter()
            .filter(|entry| !ledger.killer_vetoed(entry.killer, settings));

        let delivered: Vec<EquippedItem> = if drop_chance >= 100.0 {
            survivors.map(|entry| entry.item.clone()).collect()
        } else if drop_chance <= 0.0 {
            tracing::debug!(event = current.0, "Drop chance is 0%, skipping all personal items");
            Vec::new()
        } else {
            survivors
                .filter(|_| rng.next_unit() * 100.0 < drop_chance)
                .map(|entry| entry.item.clone())
                .collect()
        };

        tracing::info!(
            event = current.0,
            collected,
            delivered = delivered.len(),
            drop_chance,
            "Delivering personal loot"
        );
        delivered
    }

    /// Merge the personal loot of `event` into `roster`.
    ///
    /// Clears the roster first when vanilla loot removal is on, at most once
    /// per event. Adds one count per delivered item.
    pub fn deliver_to_roster(
        &mut self,
        event: Option<CombatEventId>,
        roster: &mut dyn ItemRoster,
        settings: &LootSettings,
        rng: &mut dyn RandomSource,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        if settings.remove_vanilla_item_loot
            && let Some(event) = event
            && self.claim_vanilla_clear(event)
        {
            roster.clear();
            report.cleared_vanilla = true;
            tracing::info!(event = event.0, "Vanilla item loot cleared");
        }

        for item in self.drain(event, settings, rng) {
            roster.add_to_counts(&item, 1);
            report.delivered += 1;
        }

        if report.delivered > 0 {
            tracing::debug!(entries = roster.entry_count(), "Player loot roster updated");
        }
        report
    }
}
