//! Lane Racer entry point
//!
//! Headless demo: runs a scripted drive through the simulation core and
//! reports what happened. The real game embeds the library behind a renderer
//! and a camera-backed `CaptureSession`; this binary exists to exercise the
//! full tick path end to end.

use std::path::Path;

use lane_racer::consts::*;
use lane_racer::game::{tick, GamePhase, GameState, TickInput};
use lane_racer::hazard::world::HazardModels;
use lane_racer::hazard::HazardClass;
use lane_racer::{GameConfig, Settings};

fn main() {
    env_logger::init();
    log::info!("Lane Racer (headless demo) starting...");

    let settings = Settings::load(Path::new("settings.json"));
    log::info!(
        "settings: car_speed={} fps={} steering={}",
        settings.car_speed,
        settings.max_fps.as_fps(),
        settings.steering_sensitivity
    );

    let config = GameConfig::default();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(config, settings, HazardModels::default(), seed);
    log::info!("simulation seeded with {seed}");

    // Scripted drive: accelerate, weave, shift up twice, boost, brake hard
    let scripted: [(u32, TickInput); 6] = [
        (120, TickInput::default()),
        (
            1,
            TickInput {
                shift_up: true,
                ..TickInput::default()
            },
        ),
        (
            120,
            TickInput {
                steer: -1.5,
                ..TickInput::default()
            },
        ),
        (
            1,
            TickInput {
                shift_up: true,
                boost_held: true,
                ..TickInput::default()
            },
        ),
        (
            240,
            TickInput {
                steer: 1.0,
                boost_held: true,
                ..TickInput::default()
            },
        ),
        (
            90,
            TickInput {
                braking: true,
                ..TickInput::default()
            },
        ),
    ];

    for (ticks, input) in scripted {
        for _ in 0..ticks {
            if state.phase == GamePhase::Question {
                // Answer the top option so the demo keeps moving
                let answer = TickInput {
                    select: true,
                    ..TickInput::default()
                };
                tick(&mut state, &answer);
                continue;
            }
            tick(&mut state, &input);
        }
        log::info!(
            "gear={} speed={:.1} boost={} score={} car_x={}",
            state.gear(),
            state.car.speed(),
            state.boost_active(),
            state.score.get(),
            state.car.x()
        );
    }

    let (left, right) = state.world.road().borders();
    println!("--- demo summary ---");
    println!("score: {}", state.score.get());
    println!("gear:  {}", state.gear());
    println!(
        "map:   index {} borders {:.0}..{:.0}",
        state.world.road().current_map_index(),
        left,
        right
    );
    for class in [
        HazardClass::Traffic,
        HazardClass::Crack,
        HazardClass::Br,
        HazardClass::OilSpill,
    ] {
        println!("{class:?}: {} active", state.world.hazards(class).len());
    }
    println!(
        "window {}x{}, road {} px, {} lanes",
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
        state.world.road().width(),
        state.world.road().lane_count()
    );
}
