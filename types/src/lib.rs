//! Shared settings and item types for Keep What You Deserve
//!
//! This crate contains the serializable configuration shared between the
//! loot engine (kwyd-core) and the tooling built on top of it (kwyd-cli).

use serde::{Deserialize, Serialize};


// ─────────────────────────────────────────────────────────────────────────────
// Item Classification
// ─────────────────────────────────────────────────────────────────────────────

/// Host item type, as reported by the item catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    Invalid,
    Horse,
    OneHandedWeapon,
    TwoHandedWeapon,
    Polearm,
    Arrows,
    Bolts,
    Shield,
    Bow,
    Crossbow,
    Thrown,
    Goods,
    HeadArmor,
    BodyArmor,
    LegArmor,
    HandArmor,
    Pistol,
    Musket,
    Bullets,
    Animal,
    Book,
    ChestArmor,
    Cape,
    HorseHarness,
    Banner,
}

/// Loot category an item falls into for filtering.
///
/// Every item belongs to exactly one category. `Other` covers anything
/// without a dedicated settings toggle (trade goods, banners, books...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Weapon,
    Shield,
    Ammunition,
    Mount,
    MountHarness,
    HeadArmor,
    BodyArmor,
    HandArmor,
    LegArmor,
    Cape,
    Other,
}

impl ItemCategory {
    /// Classify an item from its type and whether it has a primary weapon.
    ///
    /// Shields, ammunition, mounts and harnesses win over the weapon check:
    /// a shield carries a primary weapon component but is not a weapon here.
    pub fn classify(item_type: ItemType, has_primary_weapon: bool) -> Self {
        match item_type {
            ItemType::Shield => ItemCategory::Shield,
            ItemType::Arrows | ItemType::Bolts => ItemCategory::Ammunition,
            ItemType::Horse => ItemCategory::Mount,
            ItemType::HorseHarness => ItemCategory::MountHarness,
            _ if has_primary_weapon => ItemCategory::Weapon,
            ItemType::HeadArmor => ItemCategory::HeadArmor,
            ItemType::BodyArmor => ItemCategory::BodyArmor,
            ItemType::HandArmor => ItemCategory::HandArmor,
            ItemType::LegArmor => ItemCategory::LegArmor,
            ItemType::Cape => ItemCategory::Cape,
            _ => ItemCategory::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemCategory::Weapon => "weapon",
            ItemCategory::Shield => "shield",
            ItemCategory::Ammunition => "ammunition",
            ItemCategory::Mount => "mount",
            ItemCategory::MountHarness => "mount harness",
            ItemCategory::HeadArmor => "head armor",
            ItemCategory::BodyArmor => "body armor",
            ItemCategory::HandArmor => "hand armor",
            ItemCategory::LegArmor => "leg armor",
            ItemCategory::Cape => "cape",
            ItemCategory::Other => "other",
        }
    }
}

/// Resulting state of an agent removed from the battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    #[default]
    None,
    Active,
    Routed,
    Unconscious,
    Killed,
    Deleted,
}

impl AgentState {
    /// Killed and knocked-unconscious agents both count as casualties.
    pub fn is_casualty(&self) -> bool {
        matches!(self, AgentState::Killed | AgentState::Unconscious)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loot Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Highest troop/item tier the host knows about.
pub const MAX_TIER: i32 = 6;

/// Upper bound of the item value sliders.
pub const MAX_ITEM_VALUE_LIMIT: i32 = 1_000_000;

/// User-editable personal loot settings.
///
/// Every field has a serde default so partially written settings files
/// (older versions, hand edits) still load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootSettings {
    // Debug
    /// Show KWYD messages in the host's message log.
    #[serde(default)]
    pub enable_in_game_logging: bool,

    // Loot rules
    /// Collect gear from friendlies you down or kill.
    #[serde(default)]
    pub count_friendlies: bool,
    /// Collect gear from your companions' kills.
    #[serde(default)]
    pub count_companions: bool,
    /// Collect gear from nobles and lords.
    #[serde(default = "default_true")]
    pub count_nobles: bool,
    /// Keep personal loot even if the killer hero (player or companion) is knocked out.
    #[serde(default)]
    pub loot_when_player_ko: bool,
    /// Clear the host's default item loot so only personal loot remains (gold unaffected).
    #[serde(default)]
    pub remove_vanilla_item_loot: bool,
    /// Chance per collected item to appear in the loot roster, in percent.
    #[serde(default = "default_drop_chance")]
    pub personal_loot_drop_chance: f32,

    // Victim filters
    #[serde(default = "default_true")]
    pub include_regulars: bool,
    /// Elites are non-hero troops at or above `elite_tier_threshold`.
    #[serde(default = "default_true")]
    pub include_elites: bool,
    #[serde(default = "default_true")]
    pub include_heroes: bool,
    #[serde(default = "default_elite_tier_threshold")]
    pub elite_tier_threshold: i32,

    // Gear filters
    #[serde(default = "default_true")]
    pub include_weapons: bool,
    #[serde(default = "default_true")]
    pub include_shields: bool,
    #[serde(default = "default_true")]
    pub include_ammo: bool,
    #[serde(default = "default_true")]
    pub include_head_armor: bool,
    #[serde(default = "default_true")]
    pub include_body_armor: bool,
    #[serde(default = "default_true")]
    pub include_hand_armor: bool,
    #[serde(default = "default_true")]
    pub include_leg_armor: bool,
    #[serde(default = "default_true")]
    pub include_capes: bool,
    #[serde(default = "default_true")]
    pub include_mounts: bool,
    #[serde(default = "default_true")]
    pub include_harnesses: bool,
    /// Ignore items worth less than this.
    #[serde(default)]
    pub min_item_value: i32,
    /// Ignore items worth more than this. 0 disables the upper bound.
    #[serde(default = "default_max_item_value")]
    pub max_item_value: i32,
    #[serde(default)]
    pub exclude_civilian: bool,
    /// Only keep items at or above `high_tier_min_tier`.
    #[serde(default)]
    pub high_tier_only: bool,
    #[serde(default = "default_high_tier_min_tier")]
    pub high_tier_min_tier: i32,
}

fn default_true() -> bool {
    true
}

fn default_drop_chance() -> f32 {
    100.0
}

fn default_elite_tier_threshold() -> i32 {
    4
}

fn default_max_item_value() -> i32 {
    MAX_ITEM_VALUE_LIMIT
}

fn default_high_tier_min_tier() -> i32 {
    5
}

impl Default for LootSettings {
    fn default() -> Self {
        Self {
            enable_in_game_logging: false,
            count_friendlies: false,
            count_companions: false,
            count_nobles: true,
            loot_when_player_ko: false,
            remove_vanilla_item_loot: false,
            personal_loot_drop_chance: default_drop_chance(),
            include_regulars: true,
            include_elites: true,
            include_heroes: true,
            elite_tier_threshold: default_elite_tier_threshold(),
            include_weapons: true,
            include_shields: true,
            include_ammo: true,
            include_head_armor: true,
            include_body_armor: true,
            include_hand_armor: true,
            include_leg_armor: true,
            include_capes: true,
            include_mounts: true,
            include_harnesses: true,
            min_item_value: 0,
            max_item_value: default_max_item_value(),
            exclude_civilian: false,
            high_tier_only: false,
            high_tier_min_tier: default_high_tier_min_tier(),
        }
    }
}

impl LootSettings {
    /// Settings used when none can be loaded: defaults without a gear filter.
    pub fn fallback() -> Self {
        Self {
            max_item_value: 0,
            ..Self::default()
        }
    }

    /// Clamp every numeric option into its valid range.
    ///
    /// Out-of-range values coming from a hand-edited file are clamped,
    /// never rejected. A NaN drop chance is treated as 0.
    pub fn sanitized(mut self) -> Self {
        self.personal_loot_drop_chance = self.drop_chance_percent();
        self.min_item_value = self.min_item_value.max(0);
        self.max_item_value = self.max_item_value.max(0);
        self.elite_tier_threshold = self.elite_tier_threshold.clamp(1, MAX_TIER);
        self.high_tier_min_tier = self.high_tier_min_tier.clamp(0, MAX_TIER);
        self
    }

    /// Drop chance clamped to [0, 100].
    pub fn drop_chance_percent(&self) -> f32 {
        let chance = self.personal_loot_drop_chance;
        if chance.is_nan() {
            return 0.0;
        }
        chance.clamp(0.0, 100.0)
    }

    /// Whether the settings toggle for `category` allows collection.
    /// `Other` has no toggle and is always allowed.
    pub fn includes_category(&self, category: ItemCategory) -> bool {
        match category {
            ItemCategory::Weapon => self.include_weapons,
            ItemCategory::Shield => self.include_shields,
            ItemCategory::Ammunition => self.include_ammo,
            ItemCategory::Mount => self.include_mounts,
            ItemCategory::MountHarness => self.include_harnesses,
            ItemCategory::HeadArmor => self.include_head_armor,
            ItemCategory::BodyArmor => self.include_body_armor,
            ItemCategory::HandArmor => self.include_hand_armor,
            ItemCategory::LegArmor => self.include_leg_armor,
            ItemCategory::Cape => self.include_capes,
            ItemCategory::Other => true,
        }
    }
}
