//! Items, Loadouts and Stat Aggregation
//!
//! Items are immutable stat bundles once generated. A loadout is eight
//! named slots; armor categories fit only their own slot, weapons fit
//! either weapon slot. Effective stats are always recomputed from the
//! loadout, never patched in place.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::fixed::{Fixed, FIXED_ONE, BASE_MOVE_SPEED, from_int, from_ratio};
use crate::core::hash::StateHasher;
use crate::core::vec2::FixedVec2;

// =============================================================================
// ITEM ID
// =============================================================================

/// Unique item identifier (UUID as bytes, drawn from the match RNG).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ItemId(pub [u8; 16]);

impl ItemId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Broad item tag. Generation only ever produces `Equipment`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ItemKind {
    /// Loose pickup
    Loot = 0,
    /// Wearable gear
    Equipment = 1,
}

/// Item category: six armor categories and weapons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ItemCategory {
    /// Head armor (health)
    Helmet = 0,
    /// Body armor (health)
    Chest = 1,
    /// Leg armor (health)
    Leggings = 2,
    /// Footwear (move speed)
    Boots = 3,
    /// Hand armor (damage and attack speed)
    Gloves = 4,
    /// Jewelry (attack speed)
    Ring = 5,
    /// Sword or bow
    Weapon = 6,
}

impl ItemCategory {
    /// Every category, in slot order.
    pub const ALL: [ItemCategory; 7] = [
        ItemCategory::Helmet,
        ItemCategory::Chest,
        ItemCategory::Leggings,
        ItemCategory::Boots,
        ItemCategory::Gloves,
        ItemCategory::Ring,
        ItemCategory::Weapon,
    ];

    /// Base display name.
    pub fn base_name(self) -> &'static str {
        match self {
            ItemCategory::Helmet => "Helmet",
            ItemCategory::Chest => "Chestplate",
            ItemCategory::Leggings => "Leggings",
            ItemCategory::Boots => "Boots",
            ItemCategory::Gloves => "Gloves",
            ItemCategory::Ring => "Ring",
            ItemCategory::Weapon => "Weapon",
        }
    }

    /// The slot this category occupies by default.
    pub fn home_slot(self) -> LoadoutSlot {
        match self {
            ItemCategory::Helmet => LoadoutSlot::Helmet,
            ItemCategory::Chest => LoadoutSlot::Chest,
            ItemCategory::Leggings => LoadoutSlot::Leggings,
            ItemCategory::Boots => LoadoutSlot::Boots,
            ItemCategory::Gloves => LoadoutSlot::Gloves,
            ItemCategory::Ring => LoadoutSlot::Ring,
            ItemCategory::Weapon => LoadoutSlot::PrimaryWeapon,
        }
    }
}

/// Weapon sub-type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WeaponType {
    /// Melee
    Sword = 0,
    /// Charged ranged
    Bow = 1,
}

impl WeaponType {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            WeaponType::Sword => "Sword",
            WeaponType::Bow => "Bow",
        }
    }
}

/// Five-tier ordered rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rarity {
    /// Tier 1
    Common = 0,
    /// Tier 2
    Uncommon = 1,
    /// Tier 3
    Rare = 2,
    /// Tier 4
    Epic = 3,
    /// Tier 5
    Legendary = 4,
}

impl Rarity {
    /// Every rarity, lowest first.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Gear score contribution (1..=5).
    #[inline]
    pub fn score(self) -> u32 {
        self as u32 + 1
    }

    /// Rarity for a gear tier; out-of-range tiers clamp into 1..=5.
    pub fn from_tier(tier: i32) -> Rarity {
        Rarity::ALL[(tier.clamp(1, 5) - 1) as usize]
    }

    /// Stat multiplier in tenths (10, 15, 30, 60, 100).
    #[inline]
    pub fn multiplier_tenths(self) -> i32 {
        match self {
            Rarity::Common => 10,
            Rarity::Uncommon => 15,
            Rarity::Rare => 30,
            Rarity::Epic => 60,
            Rarity::Legendary => 100,
        }
    }

    /// Stat multiplier as fixed-point (1.0, 1.5, 3.0, 6.0, 10.0).
    #[inline]
    pub fn multiplier(self) -> Fixed {
        from_ratio(self.multiplier_tenths(), 10)
    }

    /// Word used as a name prefix.
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// Named one-of-a-kind items with special combat handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniqueWeapon {
    /// The legendary sword: huge AOE swing, slower cadence.
    Cleaver,
}

// =============================================================================
// ITEM
// =============================================================================

/// Sparse stat deltas. `None` means "no effect", not zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    /// Max health bonus
    pub health: Option<Fixed>,
    /// Flat damage bonus
    pub damage: Option<Fixed>,
    /// Move speed bonus
    pub move_speed: Option<Fixed>,
    /// Attack-speed multiplier delta (negative slows)
    pub attack_speed: Option<Fixed>,
}

impl ItemStats {
    fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_opt_fixed(self.health);
        hasher.update_opt_fixed(self.damage);
        hasher.update_opt_fixed(self.move_speed);
        hasher.update_opt_fixed(self.attack_speed);
    }
}

/// A piece of gear, either lying in the world or owned by someone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique id
    pub id: ItemId,
    /// Broad tag
    pub kind: ItemKind,
    /// Category
    pub category: ItemCategory,
    /// Present only for weapons
    pub weapon_type: Option<WeaponType>,
    /// Rarity tier
    pub rarity: Rarity,
    /// Display name
    pub name: String,
    /// Currency value
    pub value: u32,
    /// World position (meaningful only while an uncollected drop)
    pub position: FixedVec2,
    /// Collected flag
    pub collected: bool,
    /// Stat deltas, fixed at creation
    pub stats: ItemStats,
    /// Set for named unique items
    pub unique: Option<UniqueWeapon>,
}

impl Item {
    /// Pickup box edge length for ground drops.
    pub const PICKUP_SIZE: Fixed = from_int(20);

    /// Whether this is a bow.
    #[inline]
    pub fn is_bow(&self) -> bool {
        self.weapon_type == Some(WeaponType::Bow)
    }

    /// Whether this is the legendary cleaver.
    #[inline]
    pub fn is_cleaver(&self) -> bool {
        self.unique == Some(UniqueWeapon::Cleaver)
    }

    /// Add this item to a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_uuid(&self.id.0);
        hasher.update_u8(self.kind as u8);
        hasher.update_u8(self.category as u8);
        hasher.update_u8(self.weapon_type.map_or(0xFF, |w| w as u8));
        hasher.update_u8(self.rarity as u8);
        hasher.update_u32(self.value);
        hasher.update_vec2(self.position);
        hasher.update_bool(self.collected);
        self.stats.hash_into(hasher);
    }
}

// =============================================================================
// LOADOUT
// =============================================================================

/// The eight named equipment slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LoadoutSlot {
    /// Helmet slot
    Helmet = 0,
    /// Chest slot
    Chest = 1,
    /// Leggings slot
    Leggings = 2,
    /// Boots slot
    Boots = 3,
    /// Gloves slot
    Gloves = 4,
    /// Ring slot
    Ring = 5,
    /// First weapon
    PrimaryWeapon = 6,
    /// Second weapon
    SecondaryWeapon = 7,
}

impl LoadoutSlot {
    /// All slots in order.
    pub const ALL: [LoadoutSlot; 8] = [
        LoadoutSlot::Helmet,
        LoadoutSlot::Chest,
        LoadoutSlot::Leggings,
        LoadoutSlot::Boots,
        LoadoutSlot::Gloves,
        LoadoutSlot::Ring,
        LoadoutSlot::PrimaryWeapon,
        LoadoutSlot::SecondaryWeapon,
    ];

    /// The six non-weapon slots that make up base stats.
    pub const ARMOR: [LoadoutSlot; 6] = [
        LoadoutSlot::Helmet,
        LoadoutSlot::Chest,
        LoadoutSlot::Leggings,
        LoadoutSlot::Boots,
        LoadoutSlot::Gloves,
        LoadoutSlot::Ring,
    ];

    /// Whether an item of `category` may sit in this slot.
    pub fn accepts(self, category: ItemCategory) -> bool {
        match self {
            LoadoutSlot::PrimaryWeapon | LoadoutSlot::SecondaryWeapon => {
                category == ItemCategory::Weapon
            }
            armor => category != ItemCategory::Weapon && category.home_slot() == armor,
        }
    }
}

/// Which weapon slot is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WeaponSlot {
    /// Primary weapon slot
    Primary = 0,
    /// Secondary weapon slot
    Secondary = 1,
}

impl WeaponSlot {
    /// The loadout slot this selector points at.
    pub fn slot(self) -> LoadoutSlot {
        match self {
            WeaponSlot::Primary => LoadoutSlot::PrimaryWeapon,
            WeaponSlot::Secondary => LoadoutSlot::SecondaryWeapon,
        }
    }
}

/// Errors from editing a loadout or stash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadoutError {
    /// Item category does not fit the requested slot
    #[error("{category:?} cannot be equipped in the {slot:?} slot")]
    WrongSlot {
        /// Item category
        category: ItemCategory,
        /// Requested slot
        slot: LoadoutSlot,
    },
    /// Stash index does not exist
    #[error("stash index {index} out of range (stash holds {len} items)")]
    StashIndex {
        /// Requested index
        index: usize,
        /// Stash length
        len: usize,
    },
    /// Slot was already empty
    #[error("the {0:?} slot is empty")]
    EmptySlot(LoadoutSlot),
}

/// Eight fixed slots, each empty or holding one item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    slots: [Option<Item>; 8],
}

impl Loadout {
    /// Empty loadout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Item in a slot.
    #[inline]
    pub fn get(&self, slot: LoadoutSlot) -> Option<&Item> {
        self.slots[slot as usize].as_ref()
    }

    /// Item behind a weapon selector.
    #[inline]
    pub fn weapon(&self, slot: WeaponSlot) -> Option<&Item> {
        self.get(slot.slot())
    }

    /// Put an item into a slot, returning whatever was there.
    ///
    /// Rejects categories the slot does not accept. The stored item is
    /// tagged as equipment.
    pub fn equip(&mut self, slot: LoadoutSlot, mut item: Item) -> Result<Option<Item>, LoadoutError> {
        if !slot.accepts(item.category) {
            return Err(LoadoutError::WrongSlot { category: item.category, slot });
        }
        item.kind = ItemKind::Equipment;
        Ok(self.slots[slot as usize].replace(item))
    }

    /// Empty a slot.
    pub fn unequip(&mut self, slot: LoadoutSlot) -> Option<Item> {
        self.slots[slot as usize].take()
    }

    /// Swap the contents of two slots if both sides stay valid.
    pub fn swap(&mut self, a: LoadoutSlot, b: LoadoutSlot) -> Result<(), LoadoutError> {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(item) = self.get(from) {
                if !to.accepts(item.category) {
                    return Err(LoadoutError::WrongSlot { category: item.category, slot: to });
                }
            }
        }
        self.slots.swap(a as usize, b as usize);
        Ok(())
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    /// Equipped items in slot order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().flatten()
    }

    /// Number of equipped items.
    pub fn len(&self) -> usize {
        self.items().count()
    }

    /// True when nothing is equipped.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// True when either weapon slot is filled.
    pub fn has_weapon(&self) -> bool {
        self.get(LoadoutSlot::PrimaryWeapon).is_some()
            || self.get(LoadoutSlot::SecondaryWeapon).is_some()
    }

    /// Weapon slot that starts active: primary if filled, else secondary.
    pub fn default_active_slot(&self) -> Option<WeaponSlot> {
        if self.weapon(WeaponSlot::Primary).is_some() {
            Some(WeaponSlot::Primary)
        } else if self.weapon(WeaponSlot::Secondary).is_some() {
            Some(WeaponSlot::Secondary)
        } else {
            None
        }
    }

    /// Mean rarity score of equipped items, or 1.0 when empty.
    pub fn gear_score(&self) -> Fixed {
        let (sum, count) = self
            .items()
            .fold((0i32, 0i32), |(s, c), item| (s + item.rarity.score() as i32, c + 1));
        if count == 0 {
            FIXED_ONE
        } else {
            from_ratio(sum, count)
        }
    }

    /// Add every equipped item to a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        for slot in &self.slots {
            match slot {
                Some(item) => {
                    hasher.update_u8(1);
                    item.hash_into(hasher);
                }
                None => hasher.update_u8(0),
            }
        }
    }
}

// =============================================================================
// STATS
// =============================================================================

/// Attack-speed multiplier floor (0.2).
pub const MIN_ATTACK_SPEED: Fixed = 13107;

/// Effective combat stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Max health
    pub health: Fixed,
    /// Flat damage per hit
    pub damage: Fixed,
    /// Horizontal acceleration per tick
    pub move_speed: Fixed,
    /// Cadence multiplier; higher swings and draws faster
    pub attack_speed: Fixed,
}

impl Default for Stats {
    fn default() -> Self {
        Self::BASE
    }
}

impl Stats {
    /// Unequipped defaults.
    pub const BASE: Stats = Stats {
        health: from_int(100),
        damage: from_int(10),
        move_speed: BASE_MOVE_SPEED,
        attack_speed: FIXED_ONE,
    };

    /// Add every delta of an item.
    fn apply_all(mut self, stats: &ItemStats) -> Self {
        if let Some(h) = stats.health {
            self.health += h;
        }
        if let Some(m) = stats.move_speed {
            self.move_speed += m;
        }
        self.apply_offense(stats)
    }

    /// Add damage and attack-speed deltas only.
    ///
    /// Attack-speed deltas add to the multiplier: a positive delta swings
    /// faster, a negative one (the Cleaver's) slower.
    fn apply_offense(mut self, stats: &ItemStats) -> Self {
        if let Some(d) = stats.damage {
            self.damage += d;
        }
        if let Some(a) = stats.attack_speed {
            self.attack_speed += a;
        }
        self
    }

    fn floored(mut self) -> Self {
        self.attack_speed = self.attack_speed.max(MIN_ATTACK_SPEED);
        self
    }

    /// Base stats from the six armor slots.
    pub fn from_armor(loadout: &Loadout) -> Self {
        LoadoutSlot::ARMOR
            .iter()
            .filter_map(|slot| loadout.get(*slot))
            .fold(Self::BASE, |acc, item| acc.apply_all(&item.stats))
            .floored()
    }

    /// Defaults plus every delta of every given item.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        items
            .into_iter()
            .fold(Self::BASE, |acc, item| acc.apply_all(&item.stats))
            .floored()
    }

    /// Cached base stats plus the active weapon's offensive deltas.
    ///
    /// Pure: the same base and weapon always give the same result.
    pub fn with_weapon(self, weapon: Option<&Item>) -> Self {
        match weapon {
            Some(item) => self.apply_offense(&item.stats).floored(),
            None => self.floored(),
        }
    }

    /// Add to a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_fixed(self.health);
        hasher.update_fixed(self.damage);
        hasher.update_fixed(self.move_speed);
        hasher.update_fixed(self.attack_speed);
    }
}

// =============================================================================
// TESTS
// =============================================================================
