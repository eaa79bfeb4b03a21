//! Between-Match Progression
//!
//! The profile a player carries from match to match: equipped loadout,
//! stash, win streak and leaderboard rank. A win banks the loot and keeps
//! the gear; a loss costs everything that was equipped.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::rng::{DeterministicRng, derive_match_seed};
use crate::game::item::{Item, ItemCategory, Loadout, LoadoutError, LoadoutSlot};
use crate::game::loot::{generate_specific_loot, roll_bonus_rarity};
use crate::game::tick::MatchOutcome;

/// Rank a fresh profile starts at. Lower is better.
pub const STARTING_RANK: u32 = 500;

/// A bonus chest drops on every this-many-th consecutive win.
pub const BONUS_STREAK: u32 = 2;

/// What one match changed in the profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    /// Player won
    pub won: bool,
    /// Items moved into the stash (victory loot plus any bonus)
    pub stashed: usize,
    /// Bonus chest item, if the streak earned one
    pub bonus: Option<Item>,
    /// Rank before the match
    pub rank_before: u32,
    /// Rank after the match
    pub rank_after: u32,
}

/// Persistent-per-session player profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Gear worn into the next match
    pub loadout: Loadout,
    /// Items not currently equipped
    pub stash: Vec<Item>,
    /// Consecutive wins
    pub win_streak: u32,
    /// Leaderboard position (1 is best)
    pub rank: u32,
    /// Matches finished so far
    pub matches_played: u32,
    /// Root seed every match seed derives from
    pub seed: u64,
}

impl PlayerProfile {
    /// Fresh profile: nothing equipped, empty stash.
    pub fn new(seed: u64) -> Self {
        Self {
            loadout: Loadout::new(),
            stash: Vec::new(),
            win_streak: 0,
            rank: STARTING_RANK,
            matches_played: 0,
            seed,
        }
    }

    /// Seed for the next match.
    pub fn next_match_seed(&self) -> u64 {
        derive_match_seed(self.seed, self.matches_played)
    }

    /// Fold a finished match into the profile.
    pub fn apply_outcome(&mut self, outcome: &MatchOutcome, rng: &mut DeterministicRng) -> OutcomeSummary {
        let rank_before = self.rank;
        self.matches_played += 1;

        let summary = match outcome {
            MatchOutcome::Won { loot } => {
                self.win_streak += 1;
                self.stash.extend(loot.iter().cloned());
                let mut stashed = loot.len();

                let bonus = if self.win_streak % BONUS_STREAK == 0 {
                    let item = self.roll_bonus_item(rng);
                    self.stash.push(item.clone());
                    stashed += 1;
                    Some(item)
                } else {
                    None
                };

                let gain = rng.next_int_range(3, 7) as u32;
                self.rank = self.rank.saturating_sub(gain).max(1);

                OutcomeSummary { won: true, stashed, bonus, rank_before, rank_after: self.rank }
            }
            MatchOutcome::Lost => {
                self.win_streak = 0;
                self.loadout.clear();
                self.rank += rng.next_int_range(1, 3) as u32;

                OutcomeSummary { won: false, stashed: 0, bonus: None, rank_before, rank_after: self.rank }
            }
        };

        debug!(
            won = summary.won,
            streak = self.win_streak,
            rank = self.rank,
            stash = self.stash.len(),
            "Profile updated"
        );
        summary
    }

    /// Bonus chest item: any category, rarity near the current gear score.
    fn roll_bonus_item(&self, rng: &mut DeterministicRng) -> Item {
        let rarity = roll_bonus_rarity(self.loadout.gear_score(), rng);
        let category = rng.choose(&ItemCategory::ALL).copied().unwrap_or(ItemCategory::Weapon);
        let mut item = generate_specific_loot(category, rarity, None, rng);
        item.collected = true;
        item
    }

    /// Move a stash item into `slot`. Whatever the slot held goes to the
    /// end of the stash.
    pub fn equip_from_stash(&mut self, index: usize, slot: LoadoutSlot) -> Result<(), LoadoutError> {
        let item = self
            .stash
            .get(index)
            .ok_or(LoadoutError::StashIndex { index, len: self.stash.len() })?;
        if !slot.accepts(item.category) {
            return Err(LoadoutError::WrongSlot { category: item.category, slot });
        }

        let item = self.stash.remove(index);
        if let Some(previous) = self.loadout.equip(slot, item)? {
            self.stash.push(previous);
        }
        Ok(())
    }

    /// Equip a stash item into its natural slot. Weapons fill the primary
    /// slot, then the secondary, then replace the primary.
    pub fn quick_equip(&mut self, index: usize) -> Result<LoadoutSlot, LoadoutError> {
        let item = self
            .stash
            .get(index)
            .ok_or(LoadoutError::StashIndex { index, len: self.stash.len() })?;

        let slot = match item.category {
            ItemCategory::Weapon => {
                if self.loadout.get(LoadoutSlot::PrimaryWeapon).is_none() {
                    LoadoutSlot::PrimaryWeapon
                } else if self.loadout.get(LoadoutSlot::SecondaryWeapon).is_none() {
                    LoadoutSlot::SecondaryWeapon
                } else {
                    LoadoutSlot::PrimaryWeapon
                }
            }
            armor => armor.home_slot(),
        };
        self.equip_from_stash(index, slot)?;
        Ok(slot)
    }

    /// Move an equipped item back to the stash.
    pub fn unequip(&mut self, slot: LoadoutSlot) -> Result<(), LoadoutError> {
        let item = self.loadout.unequip(slot).ok_or(LoadoutError::EmptySlot(slot))?;
        self.stash.push(item);
        Ok(())
    }

    /// Exchange two equipped slots (e.g. primary and secondary weapon).
    pub fn swap_slots(&mut self, a: LoadoutSlot, b: LoadoutSlot) -> Result<(), LoadoutError> {
        self.loadout.swap(a, b)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::item::{Rarity, WeaponType};

    fn item(category: ItemCategory, rarity: Rarity, rng: &mut DeterministicRng) -> Item {
        generate_specific_loot(category, rarity, None, rng)
    }

    fn win(rng: &mut DeterministicRng, count: usize) -> MatchOutcome {
        MatchOutcome::Won {
            loot: (0..count).map(|_| item(ItemCategory::Ring, Rarity::Common, rng)).collect(),
        }
    }

    #[test]
    fn test_win_banks_loot_and_improves_rank() {
        let mut rng = DeterministicRng::new(1);
        let mut profile = PlayerProfile::new(9);
        let outcome = win(&mut rng, 2);

        let summary = profile.apply_outcome(&outcome, &mut rng);

        assert!(summary.won);
        assert_eq!(summary.stashed, 2);
        assert!(summary.bonus.is_none());
        assert_eq!(profile.stash.len(), 2);
        assert_eq!(profile.win_streak, 1);
        assert!((493..=497).contains(&profile.rank));
        assert_eq!(summary.rank_after, profile.rank);
        assert_eq!(profile.matches_played, 1);
    }

    #[test]
    fn test_every_second_win_grants_bonus() {
        let mut rng = DeterministicRng::new(2);
        let mut profile = PlayerProfile::new(9);

        let first = win(&mut rng, 1);
        assert!(profile.apply_outcome(&first, &mut rng).bonus.is_none());

        let second = win(&mut rng, 1);
        let summary = profile.apply_outcome(&second, &mut rng);
        let bonus = summary.bonus.expect("second win earns a chest");
        assert!(bonus.collected);
        assert_eq!(summary.stashed, 2);
        assert_eq!(profile.stash.len(), 3);
        assert_eq!(profile.stash.last(), Some(&bonus));
        // Empty loadout scores 1.0, jitter tops out below 2.5
        assert!(bonus.rarity <= Rarity::Uncommon);

        let third = win(&mut rng, 1);
        assert!(profile.apply_outcome(&third, &mut rng).bonus.is_none());
    }

    #[test]
    fn test_loss_wipes_loadout_and_streak() {
        let mut rng = DeterministicRng::new(3);
        let mut profile = PlayerProfile::new(9);
        profile.stash.push(item(ItemCategory::Helmet, Rarity::Epic, &mut rng));
        profile.equip_from_stash(0, LoadoutSlot::Helmet).unwrap();
        profile.win_streak = 5;

        let summary = profile.apply_outcome(&MatchOutcome::Lost, &mut rng);

        assert!(!summary.won);
        assert!(profile.loadout.is_empty());
        assert!(profile.stash.is_empty());
        assert_eq!(profile.win_streak, 0);
        assert!((501..=503).contains(&profile.rank));
    }

    #[test]
    fn test_rank_never_below_one() {
        let mut rng = DeterministicRng::new(4);
        let mut profile = PlayerProfile::new(9);
        profile.rank = 2;
        for _ in 0..5 {
            let outcome = win(&mut rng, 0);
            profile.apply_outcome(&outcome, &mut rng);
            assert_eq!(profile.rank, 1);
        }
    }

    #[test]
    fn test_equip_swaps_previous_into_stash() {
        let mut rng = DeterministicRng::new(5);
        let mut profile = PlayerProfile::new(9);
        profile.stash.push(item(ItemCategory::Boots, Rarity::Common, &mut rng));
        profile.stash.push(item(ItemCategory::Boots, Rarity::Rare, &mut rng));

        profile.equip_from_stash(0, LoadoutSlot::Boots).unwrap();
        assert_eq!(profile.stash.len(), 1);
        profile.equip_from_stash(0, LoadoutSlot::Boots).unwrap();

        assert_eq!(profile.loadout.get(LoadoutSlot::Boots).map(|i| i.rarity), Some(Rarity::Rare));
        assert_eq!(profile.stash.len(), 1);
        assert_eq!(profile.stash[0].rarity, Rarity::Common);
    }

    #[test]
    fn test_equip_errors_leave_profile_untouched() {
        let mut rng = DeterministicRng::new(6);
        let mut profile = PlayerProfile::new(9);
        profile.stash.push(item(ItemCategory::Chest, Rarity::Common, &mut rng));

        assert_eq!(
            profile.equip_from_stash(3, LoadoutSlot::Chest),
            Err(LoadoutError::StashIndex { index: 3, len: 1 })
        );
        assert_eq!(
            profile.equip_from_stash(0, LoadoutSlot::PrimaryWeapon),
            Err(LoadoutError::WrongSlot {
                category: ItemCategory::Chest,
                slot: LoadoutSlot::PrimaryWeapon
            })
        );
        assert_eq!(profile.stash.len(), 1);
        assert!(profile.loadout.is_empty());

        assert_eq!(
            profile.unequip(LoadoutSlot::Ring),
            Err(LoadoutError::EmptySlot(LoadoutSlot::Ring))
        );
    }

    #[test]
    fn test_quick_equip_fills_weapon_slots_in_order() {
        let mut rng = DeterministicRng::new(7);
        let mut profile = PlayerProfile::new(9);
        for _ in 0..3 {
            profile
                .stash
                .push(generate_specific_loot(ItemCategory::Weapon, Rarity::Common, Some(WeaponType::Sword), &mut rng));
        }
        profile.stash.push(item(ItemCategory::Gloves, Rarity::Common, &mut rng));

        assert_eq!(profile.quick_equip(0), Ok(LoadoutSlot::PrimaryWeapon));
        assert_eq!(profile.quick_equip(0), Ok(LoadoutSlot::SecondaryWeapon));
        assert_eq!(profile.quick_equip(0), Ok(LoadoutSlot::PrimaryWeapon));
        // Gloves first, then the displaced primary
        assert_eq!(profile.stash.len(), 2);
        assert_eq!(profile.quick_equip(0), Ok(LoadoutSlot::Gloves));
        assert_eq!(profile.loadout.len(), 3);
    }

    #[test]
    fn test_unequip_and_swap() {
        let mut rng = DeterministicRng::new(8);
        let mut profile = PlayerProfile::new(9);
        profile.stash.push(item(ItemCategory::Weapon, Rarity::Common, &mut rng));
        profile.equip_from_stash(0, LoadoutSlot::PrimaryWeapon).unwrap();

        profile.swap_slots(LoadoutSlot::PrimaryWeapon, LoadoutSlot::SecondaryWeapon).unwrap();
        assert!(profile.loadout.get(LoadoutSlot::PrimaryWeapon).is_none());
        assert!(profile.loadout.get(LoadoutSlot::SecondaryWeapon).is_some());

        assert!(profile.swap_slots(LoadoutSlot::SecondaryWeapon, LoadoutSlot::Helmet).is_err());

        profile.unequip(LoadoutSlot::SecondaryWeapon).unwrap();
        assert!(profile.loadout.is_empty());
        assert_eq!(profile.stash.len(), 1);
    }

    #[test]
    fn test_match_seeds_advance() {
        let mut profile = PlayerProfile::new(42);
        let first = profile.next_match_seed();
        profile.apply_outcome(&MatchOutcome::Lost, &mut DeterministicRng::new(1));
        assert_ne!(profile.next_match_seed(), first);
        assert_eq!(PlayerProfile::new(42).next_match_seed(), first);
    }
}
