//! Arcade Sim native entry point
//!
//! Runs the simulation headlessly with a simple autopilot and logs the run.
//! The browser build uses the library's `web` bindings instead.
//!
//! Usage: `arcade-sim [top-down|platformer] [--config PATH] [--level PATH] [--frames N]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use arcade_sim::sim::{EntityKind, InputEvent, LevelScript};
    use arcade_sim::{ConfigError, SimConfig, Variant, World, aim_angle};

    /// Nominal display refresh the autopilot pretends to run at
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const FIRE_EVERY: u64 = 8;
    const JUMP_EVERY: u64 = 45;

    #[derive(Debug, Default)]
    struct Args {
        variant: Option<Variant>,
        config: Option<String>,
        level: Option<String>,
        frames: Option<u64>,
    }

    fn parse_args() -> Args {
        let mut args = Args::default();
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => args.config = iter.next(),
                "--level" => args.level = iter.next(),
                "--frames" => args.frames = iter.next().and_then(|n| n.parse().ok()),
                other => match Variant::from_str(other) {
                    Some(v) => args.variant = Some(v),
                    None => log::warn!("Ignoring unknown argument {:?}", other),
                },
            }
        }
        args
    }

    /// Aim at the closest live enemy, if any
    fn autopilot_fire(world: &mut World) {
        let from = world.store().player.center();
        let target = world
            .store()
            .live(EntityKind::Enemy)
            .map(|e| e.center())
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)));
        if let Some(target) = target {
            world.handle_input(InputEvent::Fire {
                angle: aim_angle(from, target),
            });
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let args = parse_args();

        let mut config = match &args.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if let Some(variant) = args.variant {
            if args.config.is_none() {
                config = SimConfig::for_variant(variant);
            } else {
                config.variant = variant;
            }
        }
        let level = match &args.level {
            Some(path) => LevelScript::load(path)?,
            None => LevelScript::first_level(),
        };
        let frames = args.frames.unwrap_or(60 * 30);

        log::info!(
            "Arcade sim (native) starting: {} for {} frames, seed {:#x}",
            config.variant.as_str(),
            frames,
            config.seed
        );
        let variant = config.variant;
        let mut world = World::with_level(config, level);
        if variant == Variant::Platformer {
            world.handle_input(InputEvent::MoveRightStart);
        }

        let mut best_score = 0;
        let mut runs = 1;
        for frame in 0..frames {
            match variant {
                Variant::TopDown => {
                    world.advance_spawn_clock(FRAME_MS);
                    if frame % FIRE_EVERY == 0 {
                        autopilot_fire(&mut world);
                    }
                }
                Variant::Platformer => {
                    if frame % JUMP_EVERY == 0 {
                        world.handle_input(InputEvent::Jump);
                    }
                }
            }

            let before = world.state().frame;
            world.frame_tick();
            best_score = best_score.max(world.score());

            if !world.is_running() {
                log::info!("Run ended at frame {} with score {}", frame, world.score());
                world.restart();
                runs += 1;
            } else if world.state().frame < before {
                runs += 1;
            }
        }

        log::info!(
            "Finished: {} run(s), best score {}, final score {}",
            runs,
            best_score,
            world.score()
        );
        println!("best score: {}", best_score);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), arcade_sim::ConfigError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::wasm_start`, this is just to satisfy the compiler
}
