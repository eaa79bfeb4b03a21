//! Whole-match determinism: random input scripts, replayed from their
//! recordings, must land on the live run's state hash.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stickman_extraction::game::audio::NullAudio;
use stickman_extraction::game::item::{ItemCategory, LoadoutSlot, Rarity};
use stickman_extraction::game::loot::generate_specific_loot;
use stickman_extraction::session::{MatchRunner, NullObserver, PlayerProfile};
use stickman_extraction::{replay_match, tick, DeterministicRng, InputFrame, MatchConfig, WorldState};

/// Random key combinations, each held for 1..30 ticks.
fn random_script(seed: u64, len: usize) -> Vec<InputFrame> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut script = Vec::with_capacity(len);
    while script.len() < len {
        let frame = InputFrame::from_bits(rng.gen::<u8>());
        let hold = rng.gen_range(1..30);
        script.extend(std::iter::repeat(frame).take(hold));
    }
    script.truncate(len);
    script
}

fn busy_config() -> MatchConfig {
    MatchConfig {
        match_duration_seconds: 10,
        enemy_spawn_permille: 40,
        max_live_enemies: 3,
        ..MatchConfig::default()
    }
}

#[test]
fn test_random_scripts_replay_exactly() {
    for seed in 0..8u64 {
        let script = random_script(seed, 2400);
        let mut runner = MatchRunner::new(seed * 7919, Default::default(), busy_config(), NullAudio, NullObserver);
        runner.run_headless(|world| script[world.game_time as usize % script.len()], 2400);

        assert!(runner.verify_replay(), "seed {seed} diverged on replay");
    }
}

#[test]
fn test_same_seed_same_match() {
    let config = busy_config();
    let script = random_script(99, 1500);
    let run = || {
        let mut world = WorldState::new(4242, Default::default(), &config);
        let mut events = 0;
        for input in &script {
            let result = tick(&mut world, *input, &config);
            events += result.events.len();
            if result.outcome.is_some() {
                break;
            }
        }
        (world.compute_hash(), world.game_time, events)
    };

    assert_eq!(run(), run());
}

#[test]
fn test_different_seeds_diverge() {
    let config = busy_config();
    let script = random_script(5, 600);
    let hash = |seed: u64| {
        let mut world = WorldState::new(seed, Default::default(), &config);
        for input in &script {
            tick(&mut world, *input, &config);
        }
        world.compute_hash()
    };

    assert_ne!(hash(1), hash(2));
}

#[test]
fn test_geared_replay() {
    let mut rng = DeterministicRng::new(3);
    let mut profile = PlayerProfile::new(3);
    for (category, slot) in [
        (ItemCategory::Helmet, LoadoutSlot::Helmet),
        (ItemCategory::Gloves, LoadoutSlot::Gloves),
        (ItemCategory::Weapon, LoadoutSlot::PrimaryWeapon),
        (ItemCategory::Weapon, LoadoutSlot::SecondaryWeapon),
    ] {
        profile.stash.push(generate_specific_loot(category, Rarity::Epic, None, &mut rng));
        profile.equip_from_stash(0, slot).unwrap();
    }

    let config = busy_config();
    let script = random_script(11, 1800);
    let seed = profile.next_match_seed();
    let mut runner = MatchRunner::new(seed, profile.loadout.clone(), config.clone(), NullAudio, NullObserver);
    runner.run_headless(|world| script[world.game_time as usize % script.len()], 1800);

    let replayed = replay_match(seed, profile.loadout.clone(), &config, runner.recording());
    assert_eq!(replayed.compute_hash(), runner.state_hash());
    assert_eq!(replayed.game_time, runner.world().game_time);
}

#[test]
fn test_snapshot_serializes() {
    let config = busy_config();
    let mut world = WorldState::new(8, Default::default(), &config);
    for input in random_script(8, 300) {
        tick(&mut world, input, &config);
    }

    let json = serde_json::to_string(&world).unwrap();
    let back: WorldState = serde_json::from_str(&json).unwrap();
    assert_eq!(back.game_time, world.game_time);
    assert_eq!(back.player.body, world.player.body);
    assert_eq!(back.enemies.len(), world.enemies.len());
}
