//! Game Events
//!
//! Events generated during simulation. The runner forwards them to audio
//! and observers; they never feed back into the simulation.

use serde::{Serialize, Deserialize};

use crate::game::audio::SoundCue;
use crate::game::item::ItemId;
use crate::game::state::{Archetype, EnemyId};

/// Who took a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitTarget {
    /// The player
    Player,
    /// An enemy
    Enemy(EnemyId),
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Ground jump
    Jumped,
    /// Second jump in the air
    DoubleJumped,
    /// Kicked off a wall
    WallJumped,
    /// Dash started
    Dashed,
    /// Touched down after being airborne
    Landed,
    /// Melee swing started
    MeleeSwing,
    /// Bow released with enough charge
    Shot,
    /// Damage landed
    Hit {
        /// Victim
        target: HitTarget,
    },
    /// Enemy began an attack
    EnemyAttacked {
        /// Attacker
        enemy_id: EnemyId,
        /// Attacker kind
        archetype: Archetype,
    },
    /// Ranger released an arrow
    EnemyFired {
        /// Shooter
        enemy_id: EnemyId,
    },
    /// Enemy jumped (ground, wall or double)
    EnemyJumped {
        /// Jumper
        enemy_id: EnemyId,
    },
    /// Enemy entered the map
    EnemySpawned {
        /// New enemy
        enemy_id: EnemyId,
        /// Its behavior
        archetype: Archetype,
        /// Gear tier rolled
        tier: u8,
    },
    /// Enemy removed at zero health
    EnemyDefeated {
        /// Dead enemy
        enemy_id: EnemyId,
        /// Number of items dropped (0 for void deaths)
        drops: usize,
    },
    /// Ground item picked up
    ItemCollected {
        /// Collected item
        item_id: ItemId,
    },
    /// The arena walls began closing in
    SuddenDeathStarted,
    /// Match finished
    MatchEnded {
        /// Player won
        won: bool,
        /// Tick count at the end
        duration_ticks: u32,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,
    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create hit event.
    pub fn hit(tick: u32, target: HitTarget) -> Self {
        Self::new(tick, GameEventData::Hit { target })
    }

    /// Create enemy attack event.
    pub fn enemy_attacked(tick: u32, enemy_id: EnemyId, archetype: Archetype) -> Self {
        Self::new(tick, GameEventData::EnemyAttacked { enemy_id, archetype })
    }

    /// Create enemy defeated event.
    pub fn enemy_defeated(tick: u32, enemy_id: EnemyId, drops: usize) -> Self {
        Self::new(tick, GameEventData::EnemyDefeated { enemy_id, drops })
    }

    /// Create match ended event.
    pub fn match_ended(tick: u32, won: bool) -> Self {
        Self::new(tick, GameEventData::MatchEnded { won, duration_ticks: tick })
    }

    /// Sound the event should trigger, if any.
    ///
    /// Ranger arrows reuse the player's shot sound.
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match &self.data {
            GameEventData::Jumped | GameEventData::WallJumped | GameEventData::EnemyJumped { .. } => {
                Some(SoundCue::Jump)
            }
            GameEventData::DoubleJumped => Some(SoundCue::DoubleJump),
            GameEventData::Dashed => Some(SoundCue::Dash),
            GameEventData::Landed => Some(SoundCue::Land),
            GameEventData::MeleeSwing => Some(SoundCue::Attack),
            GameEventData::Shot | GameEventData::EnemyFired { .. } => Some(SoundCue::Shoot),
            GameEventData::Hit { .. } => Some(SoundCue::Hit),
            GameEventData::EnemyAttacked { .. } => Some(SoundCue::EnemyAttack),
            GameEventData::ItemCollected { .. } => Some(SoundCue::Collect),
            GameEventData::EnemySpawned { .. }
            | GameEventData::EnemyDefeated { .. }
            | GameEventData::SuddenDeathStarted
            | GameEventData::MatchEnded { .. } => None,
        }
    }
}
