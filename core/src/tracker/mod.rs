//! Loot event tracker
//!
//! Accumulates personal loot for exactly one combat event at a time.
//!
//! ```text
//!            begin_or_resync(A)                 begin_or_resync(B), B != A
//!   Idle ─────────────────────────► Tracking(A) ─────────────────────────► Tracking(B)
//!    ▲                                  │  ▲          (ledger of A discarded)
//!    │          drain(A) delivered      │  │ record_kill / record_knockout
//!    └──────────────────────────────────┘  └──┘
//! ```
//!
//! The host never announces a battle's end, and does not always announce
//! its start before the first kill. The tracker therefore compares the
//! current event id on every write and starts a fresh ledger whenever the
//! id changes.

mod delivery;

pub use delivery::DeliveryReport;


use hashbrown::HashSet;

use kwyd_types::LootSettings;

use crate::filters::{check_item, is_lootable_victim};
use crate::host::{AgentSnapshot, CombatEventId, Combatant, EquippedItem, HeroId};

/// One collected item, waiting for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootEntry {
    pub item: EquippedItem,
    /// Who is credited with the kill
    pub killer: Option<Combatant>,
    pub is_player_kill: bool,
}

/// Everything accumulated for one combat event.
#[derive(Debug)]
struct EventLedger {
    event: CombatEventId,
    entries: Vec<LootEntry>,
    player_knocked_out: bool,
    knocked_out_heroes: HashSet<HeroId>,
}

impl EventLedger {
    fn new(event: CombatEventId) -> Self {
        Self {
            event,
            entries: Vec::new(),
            player_knocked_out: false,
            knocked_out_heroes: HashSet::new(),
        }
    }

    /// Loot is blocked because the player is down and loot-on-KO is off.
    fn player_ko_blocks(&self, settings: &LootSettings) -> bool {
        self.player_knocked_out && !settings.loot_when_player_ko
    }

    /// The credited companion is down and loot-on-KO is off.
    ///
    /// Only companions can be vetoed here; the player is covered by
    /// `player_ko_blocks`.
    fn killer_vetoed(&self, killer: Option<Combatant>, settings: &LootSettings) -> bool {
        if settings.loot_when_player_ko {
            return false;
        }
        matches!(killer, Some(Combatant::Hero(hero)) if self.knocked_out_heroes.contains(&hero))
    }
}

#[derive(Debug, Default)]
enum TrackerState {
    #[default]
    Idle,
    Tracking(EventLedger),
}

/// Observable tracker phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    Idle,
    Tracking(CombatEventId),
}

/// Personal loot state for the current combat event.
#[derive(Debug, Default)]
pub struct LootTracker {
    state: TrackerState,
    /// Event whose default loot roster has already been cleared.
    /// Outlives the drain so a second roster hook for the same event
    /// does not wipe the freshly delivered loot.
    vanilla_cleared_for: Option<CombatEventId>,
}

impl LootTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TrackerPhase {
        match &self.state {
            TrackerState::Idle => TrackerPhase::Idle,
            TrackerState::Tracking(ledger) => TrackerPhase::Tracking(ledger.event),
        }
    }

    pub fn tracked_event(&self) -> Option<CombatEventId> {
        match &self.state {
            TrackerState::Idle => None,
            TrackerState::Tracking(ledger) => Some(ledger.event),
        }
    }

    /// Entries collected so far for the tracked event.
    pub fn entries(&self) -> &[LootEntry] {
        match &self.state {
            TrackerState::Idle => &[],
            TrackerState::Tracking(ledger) => &ledger.entries,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries().len()
    }

    pub fn is_player_knocked_out(&self) -> bool {
        self.ledger().is_some_and(|l| l.player_knocked_out)
    }

    pub fn is_hero_knocked_out(&self, hero: HeroId) -> bool {
        self.ledger()
            .is_some_and(|l| l.knocked_out_heroes.contains(&hero))
    }

    fn ledger(&self) -> Option<&EventLedger> {
        match &self.state {
            TrackerState::Idle => None,
            TrackerState::Tracking(ledger) => Some(ledger),
        }
    }

    /// Start tracking `current`, or keep tracking it if it already is.
    ///
    /// A different event replaces the whole ledger. Redundant calls for the
    /// tracked event never clear anything. Returns true when a new ledger
    /// was started.
    pub fn begin_or_resync(&mut self, current: Option<CombatEventId>) -> bool {
        let Some(current) = current else {
            return false;
        };

        if self.tracked_event() == Some(current) {
            return false;
        }

        if let TrackerState::Tracking(stale) = &self.state
            && !stale.entries.is_empty()
        {
            tracing::debug!(
                stale_event = stale.event.0,
                discarded = stale.entries.len(),
                "Discarding personal loot of a stale event"
            );
        }

        if self.vanilla_cleared_for != Some(current) {
            self.vanilla_cleared_for = None;
        }
        self.state = TrackerState::Tracking(EventLedger::new(current));
        tracing::debug!(event = current.0, "Tracking new map event");
        true
    }

    /// Note that the player or a companion went down in the tracked event.
    ///
    /// Ignored while idle: the next resync starts a fresh ledger anyway.
    pub fn record_knockout(&mut self, combatant: Combatant) {
        let TrackerState::Tracking(ledger) = &mut self.state else {
            tracing::debug!(?combatant, "Knockout ignored, no event tracked");
            return;
        };

        match combatant {
            Combatant::Player => {
                ledger.player_knocked_out = true;
                tracing::debug!(event = ledger.event.0, "Player knocked out");
            }
            Combatant::Hero(hero) => {
                ledger.knocked_out_heroes.insert(hero);
                tracing::debug!(event = ledger.event.0, hero = hero.0, "Companion knocked out");
            }
        }
    }

    /// Collect the victim's eligible gear for an already eligible kill.
    ///
    /// Resyncs to `current` first. Returns the number of items collected,
    /// 0 when the kill is vetoed or nothing passes the item filter.
    pub fn record_kill(
        &mut self,
        current: Option<CombatEventId>,
        victim: &AgentSnapshot,
        killer: Option<Combatant>,
        is_player_kill: bool,
        settings: &LootSettings,
    ) -> usize {
        self.begin_or_resync(current);

        let TrackerState::Tracking(ledger) = &mut self.state else {
            tracing::debug!(victim = %victim.name, "Kill ignored, no map event");
            return 0;
        };

        if ledger.player_ko_blocks(settings) {
            tracing::debug!(
                victim = %victim.name,
                "Skipping collection, player is knocked out and loot-on-KO is disabled"
            );
            return 0;
        }

        if ledger.killer_vetoed(killer, settings) {
            tracing::debug!(
                victim = %victim.name,
                ?killer,
                "Skipping collection, killer companion is knocked out and loot-on-KO is disabled"
            );
            return 0;
        }

        if !is_lootable_victim(victim, settings) {
            tracing::debug!(
                victim = %victim.name,
                tier = victim.tier,
                "Victim excluded by victim filters"
            );
            return 0;
        }

        let Some(equipment) = &victim.equipment else {
            tracing::debug!(victim = %victim.name, "Victim has no spawn equipment");
            return 0;
        };

        let before = ledger.entries.len();
        for (index, slot) in equipment.slots() {
            match check_item(slot, settings) {
                Ok(category) => {
                    let Some(equipped) = slot else { continue };
                    tracing::trace!(
                        ?index,
                        item = %equipped.item.id,
                        category = category.label(),
                        "Collected"
                    );
                    ledger.entries.push(LootEntry {
                        item: equipped.clone(),
                        killer,
                        is_player_kill,
                    });
                }
                Err(reason) => {
                    if slot.is_some() {
                        tracing::trace!(?index, ?reason, "Item skipped");
                    }
                }
            }
        }

        let added = ledger.entries.len() - before;
        tracing::debug!(
            event = ledger.event.0,
            victim = %victim.name,
            added,
            total = ledger.entries.len(),
            "Kill registered"
        );
        added
    }

    /// Whether the default roster of `event` should be cleared now.
    ///
    /// Returns true at most once per event.
    pub fn claim_vanilla_clear(&mut self, event: CombatEventId) -> bool {
        if self.vanilla_cleared_for == Some(event) {
            return false;
        }
        self.vanilla_cleared_for = Some(event);
        true
    }

    fn reset(&mut self) {
        self.state = TrackerState::Idle;
    }
}
