//! Battle scripts
//!
//! A battle script describes agents and one or more combat events as a
//! sequence of host callbacks, so a settings combination can be checked
//! without the game.
//!
//! ```toml
//! [settings]
//! count_companions = true
//!
//! [[agent]]
//! id = "player"
//! main_agent = true
//! team = 1
//!
//! [[agent]]
//! id = "looter"
//! team = 2
//! tier = 1
//! [[agent.item]]
//! slot = "weapon0"
//! id = "pitchfork"
//! item_type = "polearm"
//! value = 40
//!
//! [[event]]
//! id = 1
//! [[event.step]]
//! kind = "kill"
//! victim = "looter"
//! killer = "player"
//! [[event.step]]
//! kind = "loot"
//! ```

use std::path::Path;

use hashbrown::HashSet;
use serde::Deserialize;

use kwyd_core::{
    AgentSnapshot, Equipment, EquipmentIndex, EquippedItem, HeroId, ItemDescriptor, LootShareSite,
    TeamId,
};
use kwyd_types::{AgentState, ItemType, LootSettings};

use crate::error::ScriptError;

#[cfg(test)]
#[path = "script_tests.rs"]
mod script_tests;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BattleScript {
    /// Overrides merged over the base settings
    #[serde(default)]
    pub settings: Option<toml::Table>,

    #[serde(default, rename = "agent")]
    pub agents: Vec<AgentSpec>,

    #[serde(default, rename = "event")]
    pub events: Vec<EventSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub team: Option<u32>,
    #[serde(default)]
    pub tier: i32,
    /// Hero id for named characters
    #[serde(default)]
    pub hero: Option<u64>,
    #[serde(default)]
    pub main_agent: bool,
    #[serde(default)]
    pub mount: bool,
    /// Fights for the player's main party
    #[serde(default)]
    pub main_party: bool,
    /// Agent spawned without equipment data
    #[serde(default)]
    pub no_equipment: bool,
    #[serde(default, rename = "item")]
    pub items: Vec<EquippedSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub item_type: ItemType,
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub tier: i32,
    #[serde(default)]
    pub civilian: bool,
    /// Defaults to true for weapons, shields and ammunition
    #[serde(default)]
    pub primary_weapon: Option<bool>,
    #[serde(default)]
    pub modifier: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EquippedSpec {
    pub slot: EquipmentIndex,
    #[serde(flatten)]
    pub item: ItemSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StackSpec {
    #[serde(flatten)]
    pub item: ItemSpec,
    #[serde(default = "default_count")]
    pub count: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSpec {
    pub id: u64,
    #[serde(default = "default_true")]
    pub campaign: bool,
    /// Default loot the host puts in the roster before personal loot
    #[serde(default)]
    pub vanilla: Vec<StackSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteSpec {
    #[default]
    Player,
    Receiving,
}

impl From<SiteSpec> for LootShareSite {
    fn from(site: SiteSpec) -> Self {
        match site {
            SiteSpec::Player => LootShareSite::PlayerLootShare,
            SiteSpec::Receiving => LootShareSite::ReceivingLootShare,
        }
    }
}

/// One host callback.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Agent removed by a killer
    Kill {
        victim: String,
        killer: String,
        #[serde(default = "default_state")]
        state: AgentState,
    },
    /// Agent knocked unconscious, optionally by someone
    Knockout {
        victim: String,
        #[serde(default)]
        killer: Option<String>,
    },
    /// The player's agent goes down and stays down
    PlayerDown {
        #[serde(default)]
        killer: Option<String>,
    },
    /// The host builds a loot roster
    Loot {
        #[serde(default)]
        site: SiteSpec,
        /// Receiving party, the player's main party when absent
        #[serde(default)]
        party: Option<u64>,
    },
    /// The player edits the settings mid-battle
    ChangeSettings { set: toml::Table },
}

fn default_true() -> bool {
    true
}

fn default_count() -> i32 {
    1
}

fn default_state() -> AgentState {
    AgentState::Killed
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

impl BattleScript {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse and validate script text. `origin` is only used in errors.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ScriptError> {
        let script: BattleScript = toml::from_str(content).map_err(|source| ScriptError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        script.validate()?;
        Ok(script)
    }

    pub fn agent(&self, id: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn main_agent(&self) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.main_agent)
    }

    /// Every agent id is unique and every step names a declared agent.
    fn validate(&self) -> Result<(), ScriptError> {
        let mut seen = HashSet::new();
        for agent in &self.agents {
            if !seen.insert(agent.id.as_str()) {
                return Err(ScriptError::DuplicateAgent(agent.id.clone()));
            }
        }

        for event in &self.events {
            let check = |agent: &str| -> Result<(), ScriptError> {
                if seen.contains(agent) {
                    Ok(())
                } else {
                    Err(ScriptError::UnknownAgent {
                        event: event.id,
                        agent: agent.to_string(),
                    })
                }
            };

            for step in &event.steps {
                match step {
                    Step::Kill { victim, killer, .. } => {
                        check(victim.as_str())?;
                        check(killer.as_str())?;
                    }
                    Step::Knockout { victim, killer } => {
                        check(victim.as_str())?;
                        if let Some(killer) = killer {
                            check(killer.as_str())?;
                        }
                    }
                    Step::PlayerDown { killer } => {
                        if self.main_agent().is_none() {
                            return Err(ScriptError::NoMainAgent { event: event.id });
                        }
                        if let Some(killer) = killer {
                            check(killer.as_str())?;
                        }
                    }
                    Step::Loot { .. } | Step::ChangeSettings { .. } => {}
                }
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion
// ─────────────────────────────────────────────────────────────────────────────

impl AgentSpec {
    pub fn snapshot(&self) -> AgentSnapshot {
        let equipment = (!self.no_equipment).then(|| {
            self.items.iter().fold(Equipment::new(), |equipment, spec| {
                equipment.with(spec.slot, spec.item.to_equipped())
            })
        });

        AgentSnapshot {
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            is_main_agent: self.main_agent,
            is_mount: self.mount,
            hero: self.hero.map(HeroId),
            tier: self.tier,
            team: self.team.map(TeamId),
            origin_is_main_party: self.main_party || self.main_agent,
            equipment,
        }
    }
}

impl ItemSpec {
    pub fn to_equipped(&self) -> EquippedItem {
        let descriptor = ItemDescriptor {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_else(|| self.id.replace('_', " ")),
            value: self.value,
            tier: self.tier,
            item_type: self.item_type,
            has_primary_weapon: self
                .primary_weapon
                .unwrap_or_else(|| has_weapon_component(self.item_type)),
            is_civilian: self.civilian,
        };
        match &self.modifier {
            Some(modifier) => EquippedItem::with_modifier(descriptor, modifier.clone()),
            None => EquippedItem::new(descriptor),
        }
    }
}

fn has_weapon_component(item_type: ItemType) -> bool {
    matches!(
        item_type,
        ItemType::OneHandedWeapon
            | ItemType::TwoHandedWeapon
            | ItemType::Polearm
            | ItemType::Bow
            | ItemType::Crossbow
            | ItemType::Thrown
            | ItemType::Pistol
            | ItemType::Musket
            | ItemType::Shield
            | ItemType::Arrows
            | ItemType::Bolts
            | ItemType::Bullets
    )
}

/// Merge `overrides` over `base`. Keys must name existing settings.
pub fn apply_overrides(
    base: LootSettings,
    overrides: &toml::Table,
) -> Result<LootSettings, ScriptError> {
    let mut value = toml::Value::try_from(base)?;
    if let toml::Value::Table(table) = &mut value {
        for (key, override_value) in overrides {
            if !table.contains_key(key) {
                return Err(ScriptError::UnknownSetting(key.clone()));
            }
            table.insert(key.clone(), override_value.clone());
        }
    }
    let merged: LootSettings = value.try_into().map_err(ScriptError::InvalidSettings)?;
    Ok(merged.sanitized())
}
