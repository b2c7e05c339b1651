//! Item eligibility
//!
//! Applied once per equipped slot of an eligible victim. All rules are
//! independent predicates; the cheap ones run first.

use kwyd_types::{ItemCategory, LootSettings};

use crate::host::EquippedItem;

/// Why an equipped item was not collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRejection {
    EmptySlot,
    BelowMinValue,
    AboveMaxValue,
    Civilian,
    CategoryExcluded(ItemCategory),
    BelowMinTier,
}

/// Check one equipment slot, returning the item's category when it may be collected.
pub fn check_item(
    slot: Option<&EquippedItem>,
    settings: &LootSettings,
) -> Result<ItemCategory, ItemRejection> {
    let Some(equipped) = slot else {
        return Err(ItemRejection::EmptySlot);
    };
    let item = &equipped.item;

    // Negative bounds count as 0
    let min_value = settings.min_item_value.max(0);
    let max_value = settings.max_item_value.max(0);

    if item.value < min_value {
        return Err(ItemRejection::BelowMinValue);
    }
    if max_value > 0 && item.value > max_value {
        return Err(ItemRejection::AboveMaxValue);
    }

    if settings.exclude_civilian && item.is_civilian {
        return Err(ItemRejection::Civilian);
    }

    let category = item.category();
    if !settings.includes_category(category) {
        return Err(ItemRejection::CategoryExcluded(category));
    }

    if settings.high_tier_only && item.tier < settings.high_tier_min_tier {
        return Err(ItemRejection::BelowMinTier);
    }

    Ok(category)
}

/// Whether one equipment slot may be collected.
pub fn is_eligible_item(slot: Option<&EquippedItem>, settings: &LootSettings) -> bool {
    check_item(slot, settings).is_ok()
}
