//! Shared fixtures for unit tests

use kwyd_types::ItemType;

use crate::host::{
    AgentSnapshot, CombatEventId, Equipment, EquipmentIndex, EquippedItem, GameHost, HeroId,
    ItemDescriptor, PartyId, TeamId,
};

pub const PLAYER_TEAM: TeamId = TeamId(1);
pub const ENEMY_TEAM: TeamId = TeamId(2);
pub const MAIN_PARTY: PartyId = PartyId(100);
pub const PLAYER_HERO: HeroId = HeroId(1);
pub const COMPANION: HeroId = HeroId(7);

/// Scriptable host: one player party, two hostile teams.
#[derive(Debug, Clone)]
pub struct FakeHost {
    pub campaign: bool,
    pub map_event: Option<CombatEventId>,
    pub player_knocked_out: bool,
}

impl FakeHost {
    pub fn in_battle(event: u64) -> Self {
        Self {
            campaign: true,
            map_event: Some(CombatEventId(event)),
            player_knocked_out: false,
        }
    }
}

impl GameHost for FakeHost {
    fn is_campaign(&self) -> bool {
        self.campaign
    }

    fn player_map_event(&self) -> Option<CombatEventId> {
        self.map_event
    }

    fn is_player_knocked_out(&self) -> bool {
        self.player_knocked_out
    }

    fn are_hostile(&self, a: TeamId, b: TeamId) -> bool {
        a != b
    }

    fn is_main_party(&self, party: PartyId) -> bool {
        party == MAIN_PARTY
    }
}

pub fn item(id: &str, item_type: ItemType, value: i32, tier: i32) -> EquippedItem {
    let has_primary_weapon = matches!(
        item_type,
        ItemType::OneHandedWeapon
            | ItemType::TwoHandedWeapon
            | ItemType::Polearm
            | ItemType::Bow
            | ItemType::Crossbow
            | ItemType::Thrown
            | ItemType::Shield
            | ItemType::Arrows
            | ItemType::Bolts
    );
    EquippedItem::new(ItemDescriptor {
        id: id.to_string(),
        name: id.replace('_', " "),
        value,
        tier,
        item_type,
        has_primary_weapon,
        is_civilian: false,
    })
}

pub fn sword(value: i32) -> EquippedItem {
    item("sword", ItemType::OneHandedWeapon, value, 2)
}

pub fn shield(value: i32) -> EquippedItem {
    item("round_shield", ItemType::Shield, value, 1)
}

pub fn player() -> AgentSnapshot {
    AgentSnapshot {
        name: "Player".to_string(),
        is_main_agent: true,
        hero: Some(PLAYER_HERO),
        tier: 0,
        team: Some(PLAYER_TEAM),
        origin_is_main_party: true,
        ..AgentSnapshot::default()
    }
}

pub fn companion() -> AgentSnapshot {
    AgentSnapshot {
        name: "Companion".to_string(),
        hero: Some(COMPANION),
        tier: 0,
        team: Some(PLAYER_TEAM),
        origin_is_main_party: true,
        ..AgentSnapshot::default()
    }
}

/// Regular enemy troop carrying a 50-denar sword and a 10-denar shield.
pub fn looter() -> AgentSnapshot {
    AgentSnapshot {
        name: "Looter".to_string(),
        tier: 2,
        team: Some(ENEMY_TEAM),
        equipment: Some(
            Equipment::new()
                .with(EquipmentIndex::Weapon0, sword(50))
                .with(EquipmentIndex::Weapon1, shield(10)),
        ),
        ..AgentSnapshot::default()
    }
}

pub fn enemy_with(tier: i32, equipment: Equipment) -> AgentSnapshot {
    AgentSnapshot {
        name: "Enemy".to_string(),
        tier,
        team: Some(ENEMY_TEAM),
        equipment: Some(equipment),
        ..AgentSnapshot::default()
    }
}

pub fn enemy_lord() -> AgentSnapshot {
    AgentSnapshot {
        name: "Enemy Lord".to_string(),
        hero: Some(HeroId(500)),
        tier: 6,
        team: Some(ENEMY_TEAM),
        equipment: Some(Equipment::new().with(
            EquipmentIndex::Body,
            item("lamellar", ItemType::BodyArmor, 4000, 5),
        )),
        ..AgentSnapshot::default()
    }
}
