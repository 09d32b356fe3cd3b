//! Tank Battle entry point
//!
//! Runs a headless session driven by a simple autopilot and logs what
//! happens. Native builds keep settings and records under `$HOME`; wasm32
//! builds keep them in LocalStorage. Rendering, audio output and input
//! capture live in the platform front-ends.

use glam::Vec2;
use tank_battle::audio::AudioMixer;
use tank_battle::sim::{GameEvent, TickInput, World, tick};
use tank_battle::{ScoreStore, Settings};

/// Display frame rate the runner pretends to have
const FRAME_DT: f32 = 1.0 / 60.0;

/// Session length when none is given
const DEFAULT_SECONDS: f64 = 120.0;

/// Aim at the closest enemy, chase pickups, otherwise strafe
fn autopilot(world: &World) -> TickInput {
    let me = world.player.pos;
    let nearest = |points: &mut dyn Iterator<Item = Vec2>| {
        points.min_by(|a, b| {
            a.distance_squared(me)
                .partial_cmp(&b.distance_squared(me))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    };

    let target = nearest(&mut world.enemies.iter().map(|e| e.pos));
    let pickup = nearest(&mut world.powerups.iter().map(|p| p.pos));

    let mut input = TickInput {
        aim: target.unwrap_or(me + Vec2::new(0.0, -100.0)),
        fire: target.is_some(),
        ..Default::default()
    };

    if let Some(goal) = pickup {
        let to = goal - me;
        input.left = to.x < -4.0;
        input.right = to.x > 4.0;
        input.up = to.y < -4.0;
        input.down = to.y > 4.0;
    } else {
        // Sway left and right every two seconds
        let leftward = (world.time / 2.0) as u32 % 2 == 0;
        input.left = leftward;
        input.right = !leftward;
    }
    input
}

/// Play one autopilot session until time runs out or the run ends
fn run_session(seed: u64, seconds: f64, settings: &Settings, store: &mut dyn ScoreStore) {
    let mixer = AudioMixer::from_settings(settings);

    log::info!(
        "Tank Battle (headless) starting: seed {}, {} s, quality {}",
        seed,
        seconds,
        settings.quality.as_str()
    );
    let mut world = World::new(seed);
    settings.apply(&mut world);

    let mut cues = 0usize;
    while world.time < seconds && !world.is_game_over() {
        let input = autopilot(&world);
        let events = tick(&mut world, &input, FRAME_DT, store);
        cues += mixer.cues(&events).len();

        for event in &events {
            match event {
                GameEvent::WaveChanged { wave } => log::info!("[{:>6.1}s] wave {}", world.time, wave),
                GameEvent::LivesChanged { lives } => log::info!("[{:>6.1}s] lives {}", world.time, lives),
                GameEvent::EnemyDestroyed { variant, .. } => {
                    log::debug!("[{:>6.1}s] destroyed {:?}, score {}", world.time, variant, world.score)
                }
                _ => {}
            }
        }
    }

    log::info!(
        "Finished at {:.1}s: score {}, wave {}, lives {}, {} sound cues",
        world.time,
        world.score,
        world.wave,
        world.lives,
        cues
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use tank_battle::highscores::StoreError;
    use tank_battle::{FileStore, QualityPreset, ScoreStore, Settings};

    fn data_dir() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".tank_battle")
    }

    /// Usage: `tank-battle [seed] [seconds] [low|medium|high]`
    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random::<u64>);
        let seconds: f64 = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(super::DEFAULT_SECONDS);

        let dir = data_dir();
        let settings_path = dir.join("settings.json");
        let mut settings = Settings::load_from(&settings_path);

        // A quality given on the command line becomes the saved preference
        if let Some(arg) = args.next() {
            match QualityPreset::parse(&arg) {
                Some(quality) => {
                    settings.quality = quality;
                    let saved = std::fs::create_dir_all(&dir)
                        .map_err(StoreError::from)
                        .and_then(|()| settings.save_to(&settings_path));
                    if let Err(e) = saved {
                        log::warn!("Failed to save settings: {}", e);
                    }
                }
                None => log::warn!("Unknown quality preset '{}', keeping {}", arg, settings.quality.as_str()),
            }
        }

        let mut store = FileStore::open(dir.join("records.json"));
        super::run_session(seed, seconds, &settings, &mut store);

        println!(
            "Records: high score {}, best wave {}",
            store.load_high_score(),
            store.load_best_wave()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    let settings = Settings::load();
    let mut store = tank_battle::highscores::LocalStorageStore;
    run_session(rand::random::<u64>(), DEFAULT_SECONDS, &settings, &mut store);
}
