//! Stickman Extraction Headless Runner
//!
//! Plays a series of matches with a scripted bot, folds each outcome into
//! a profile and verifies every match by replaying its input recording.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use stickman_extraction::{
    TICK_RATE, VERSION,
    core::fixed::{from_int, to_float, FIXED_ONE},
    core::rng::DeterministicRng,
    game::{
        audio::NullAudio,
        config::MatchConfig,
        input::{InputFrame, Key},
        item::LoadoutSlot,
        state::{BowCharge, WorldState},
        tick::{HudSnapshot, MatchOutcome},
    },
    session::{MatchObserver, MatchRunner, PlayerProfile},
};

/// Command line options.
#[derive(Debug, Parser)]
#[command(name = "stickman-extraction", version, about = "Run Stickman Extraction matches headlessly")]
struct Args {
    /// Profile seed; every match seed derives from it
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// JSON match configuration (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pace ticks in real time instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Give up on a match after this many ticks
    #[arg(long, default_value_t = 6000)]
    max_ticks: u32,

    /// Number of matches to play back to back
    #[arg(long, default_value_t = 3)]
    matches: u32,
}

/// Logs HUD once a second and the outcome.
#[derive(Default)]
struct LogObserver {
    last_second: Option<u32>,
}

impl MatchObserver for LogObserver {
    fn on_hud(&mut self, hud: &HudSnapshot) {
        if self.last_second == Some(hud.elapsed_seconds) {
            return;
        }
        self.last_second = Some(hud.elapsed_seconds);
        debug!(
            seconds = hud.elapsed_seconds,
            countdown = hud.countdown_seconds,
            health = to_float(hud.health),
            dash_cooldown = hud.dash_cooldown,
            "HUD"
        );
    }

    fn on_outcome(&mut self, outcome: &MatchOutcome) {
        match outcome {
            MatchOutcome::Won { loot } => {
                for item in loot {
                    info!(name = %item.name, rarity = item.rarity.label(), id = %item.id.to_uuid_string(), "Loot");
                }
            }
            MatchOutcome::Lost => info!("Extraction failed, equipped gear lost"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MatchConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MatchConfig::default(),
    };

    info!("Stickman Extraction v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);
    info!(
        "Sudden death after {} ticks ({} seconds)",
        config.match_duration_ticks(),
        config.match_duration_seconds
    );

    let mut profile = PlayerProfile::new(args.seed);
    let mut profile_rng = DeterministicRng::new(args.seed);

    for index in 0..args.matches {
        let seed = profile.next_match_seed();
        info!("=== Match {} (seed {}) ===", index + 1, seed);

        let mut runner = MatchRunner::new(seed, profile.loadout.clone(), config.clone(), NullAudio, LogObserver::default());
        let outcome = if args.realtime {
            runner.run_realtime(demo_bot, args.max_ticks).await.cloned()
        } else {
            runner.run_headless(demo_bot, args.max_ticks).cloned()
        };

        info!("Final State Hash: {}", hex::encode(runner.state_hash()));
        info!("Input Recording Hash: {}", hex::encode(runner.recording().compute_hash()));
        if !runner.verify_replay() {
            bail!("replay of match {} diverged from the live run", index + 1);
        }
        info!("DETERMINISM VERIFIED: replay hash matches");

        let Some(outcome) = outcome else {
            info!("No result after {} ticks, match abandoned", runner.world().game_time);
            continue;
        };

        let summary = profile.apply_outcome(&outcome, &mut profile_rng);
        if let Some(bonus) = &summary.bonus {
            info!(name = %bonus.name, "Bonus chest");
        }
        info!(
            won = summary.won,
            ticks = runner.world().game_time,
            rank = summary.rank_after,
            streak = profile.win_streak,
            "Match over"
        );

        auto_equip(&mut profile);
    }

    info!(
        rank = profile.rank,
        stash = profile.stash.len(),
        equipped = profile.loadout.len(),
        "=== Session Results ==="
    );
    Ok(())
}

/// Put stash items into any empty slot that accepts them.
fn auto_equip(profile: &mut PlayerProfile) {
    let mut index = 0;
    while index < profile.stash.len() {
        let category = profile.stash[index].category;
        let free = LoadoutSlot::ALL
            .into_iter()
            .find(|slot| slot.accepts(category) && profile.loadout.get(*slot).is_none());
        match free {
            Some(slot) if profile.equip_from_stash(index, slot).is_ok() => {
                debug!(?slot, "Equipped from stash");
            }
            _ => index += 1,
        }
    }
}

/// Walk at the nearest enemy, hop over obstacles and attack in range.
fn demo_bot(world: &WorldState) -> InputFrame {
    let mut frame = InputFrame::new();
    let me = &world.player;

    let Some(target) = world
        .enemies
        .iter()
        .min_by_key(|e| (e.body.pos.x - me.body.pos.x).abs())
    else {
        return frame;
    };

    let dx = target.body.pos.x - me.body.pos.x;
    if dx > from_int(40) {
        frame.set(Key::Right, true);
    } else if dx < -from_int(40) {
        frame.set(Key::Left, true);
    }

    let stalled = me.body.vel.x.abs() < FIXED_ONE / 2 && dx.abs() > from_int(60);
    let falling = me.body.vel.y > 0;
    if (me.body.grounded && stalled) || (!me.body.grounded && falling && me.jump.can_double_jump) {
        frame.set(Key::Jump, true);
    }

    if me.has_bow_active() {
        // Draw to full power, then let go for one tick
        frame.set(Key::Action, me.bow.charge_time < BowCharge::MAX_CHARGE && dx.abs() < from_int(600));
    } else if dx.abs() < from_int(70) {
        frame.set(Key::Action, true);
    }

    frame
}
