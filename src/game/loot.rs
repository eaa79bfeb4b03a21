//! Loot Generation
//!
//! Procedural item rolls. Every draw comes from the match RNG so drops
//! are reproducible. Stat rolls are computed on integer tenths and
//! hundredths and converted to fixed-point once.

use crate::core::fixed::{Fixed, FIXED_HALF, from_int, from_ratio, fixed_floor};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::FixedVec2;
use crate::game::collision::{Aabb, aabb_overlap};
use crate::game::effects;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::item::{
    Item, ItemCategory, ItemId, ItemKind, ItemStats, Rarity, UniqueWeapon, WeaponType,
};
use crate::game::state::{ParticleColor, WorldState};

/// Display name of the unique legendary sword.
pub const CLEAVER_NAME: &str = "Legendary Cleaver";

/// Cleaver base damage before the rarity multiplier.
const CLEAVER_BASE_DAMAGE: i32 = 40;

/// Random-loot rarity cut points on a 0..1000 roll (70/20/7/2.5/0.5 %).
const RARITY_THRESHOLDS: [(u32, Rarity); 4] = [
    (995, Rarity::Legendary),
    (970, Rarity::Epic),
    (900, Rarity::Rare),
    (700, Rarity::Uncommon),
];

/// Generate an item of a given category and rarity.
///
/// Weapons pick sword or bow with equal odds unless `forced_weapon_type`
/// is given. A legendary sword is always the unique Cleaver.
pub fn generate_specific_loot(
    category: ItemCategory,
    rarity: Rarity,
    forced_weapon_type: Option<WeaponType>,
    rng: &mut DeterministicRng,
) -> Item {
    let m10 = rarity.multiplier_tenths();
    let mut weapon_type = None;
    let mut unique = None;

    let (base_name, stats) = match category {
        ItemCategory::Helmet => (category.base_name(), health_stats(10 * m10 / 10)),
        ItemCategory::Chest => (category.base_name(), health_stats(25 * m10 / 10)),
        ItemCategory::Leggings => (category.base_name(), health_stats(15 * m10 / 10)),
        ItemCategory::Boots => (
            category.base_name(),
            ItemStats { move_speed: Some(from_ratio(2 * m10, 100)), ..Default::default() },
        ),
        ItemCategory::Gloves => (
            category.base_name(),
            ItemStats {
                damage: Some(from_int(5 * m10 / 10)),
                // 0.05 * m rounded to hundredths, halves up
                attack_speed: Some(from_ratio((5 * m10 + 5) / 10, 100)),
                ..Default::default()
            },
        ),
        ItemCategory::Ring => (
            category.base_name(),
            ItemStats { attack_speed: Some(from_ratio(m10, 100)), ..Default::default() },
        ),
        ItemCategory::Weapon => {
            let kind = forced_weapon_type.unwrap_or_else(|| {
                if rng.coin_flip() { WeaponType::Bow } else { WeaponType::Sword }
            });
            weapon_type = Some(kind);

            if rarity == Rarity::Legendary && kind == WeaponType::Sword {
                unique = Some(UniqueWeapon::Cleaver);
                (
                    CLEAVER_NAME,
                    ItemStats {
                        damage: Some(from_int(CLEAVER_BASE_DAMAGE * m10 / 10)),
                        attack_speed: Some(-FIXED_HALF),
                        ..Default::default()
                    },
                )
            } else {
                let base = match kind {
                    WeaponType::Bow => 8,
                    WeaponType::Sword => 10,
                };
                (
                    kind.name(),
                    ItemStats { damage: Some(from_int(base * m10 / 10)), ..Default::default() },
                )
            }
        }
    };

    let name = if base_name.to_lowercase().contains(&rarity.label().to_lowercase()) {
        base_name.to_string()
    } else {
        format!("{} {}", rarity.label(), base_name)
    };

    Item {
        id: ItemId::new(rng.next_uuid_bytes()),
        kind: ItemKind::Equipment,
        category,
        weapon_type,
        rarity,
        name,
        value: roll_value(rarity, rng),
        position: FixedVec2::ZERO,
        collected: true,
        stats,
        unique,
    }
}

/// Generate a random item dropped at a position.
///
/// Category is uniform; rarity is Common 70 %, Uncommon 20 %, Rare 7 %,
/// Epic 2.5 %, Legendary 0.5 %.
pub fn generate_random_loot(position: FixedVec2, rng: &mut DeterministicRng) -> Item {
    let category = ItemCategory::ALL[rng.next_int(ItemCategory::ALL.len() as u32) as usize];
    let rarity = roll_rarity(rng);
    let mut item = generate_specific_loot(category, rarity, None, rng);
    item.position = position;
    item
}

/// Draw a rarity from the drop table.
pub fn roll_rarity(rng: &mut DeterministicRng) -> Rarity {
    let roll = rng.next_int(1000);
    RARITY_THRESHOLDS
        .iter()
        .find(|(cut, _)| roll >= *cut)
        .map_or(Rarity::Common, |(_, rarity)| *rarity)
}

/// Rarity of a bonus reward near the given gear score.
///
/// The score is jittered by U(-0.5, 1.0) and bucketed at
/// 1.5 / 2.5 / 3.5 / 4.5.
pub fn roll_bonus_rarity(gear_score: Fixed, rng: &mut DeterministicRng) -> Rarity {
    let adjusted = gear_score + rng.next_fixed_range(-FIXED_HALF, from_int(1));
    // score >= n + 0.5 lands in tier n + 1
    let tier = fixed_floor(adjusted + FIXED_HALF);
    Rarity::from_tier(tier)
}

/// Currency value: floor((50 + U[0, 100)) * multiplier).
fn roll_value(rarity: Rarity, rng: &mut DeterministicRng) -> u32 {
    let base = from_int(50) + rng.next_fixed(from_int(100));
    let scaled = (base as i64 * rarity.multiplier_tenths() as i64) / 10;
    (scaled >> 16) as u32
}

fn health_stats(hp: i32) -> ItemStats {
    ItemStats { health: Some(from_int(hp)), ..Default::default() }
}

// =============================================================================
// PICKUP
// =============================================================================

/// Pick up every uncollected ground item the player overlaps.
///
/// Collected items are appended to the match inventory and stay in the
/// world list flagged as collected.
pub fn collect_items(world: &mut WorldState) {
    let tick = world.game_time;
    let WorldState { player, items, particles, rng, pending_events, .. } = world;

    for item in items.iter_mut().filter(|item| !item.collected) {
        let bounds = Aabb::new(item.position, Item::PICKUP_SIZE, Item::PICKUP_SIZE);
        if !aabb_overlap(&player.body, &bounds) {
            continue;
        }

        item.collected = true;
        player.inventory.push(item.clone());
        effects::spray(particles, rng, item.position, ParticleColor::Yellow, 8, from_int(5));
        pending_events.push(GameEvent::new(tick, GameEventData::ItemCollected { item_id: item.id }));
    }
}

// =============================================================================
// TESTS
// =============================================================================
