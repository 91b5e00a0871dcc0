//! Fruit Merge entry point
//!
//! The browser build runs through `fruit_merge::web`. Natively there is no
//! window: this runs a headless autoplay session and prints the final frame.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use fruit_merge::{Game, GameEvent, GamePhase, Intent};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("Fruit Merge (native) starting headless autoplay...");

    const SEED: u64 = 0x5eed;
    const MAX_TICKS: u64 = 60 * 60 * 5;

    let mut game = Game::new(SEED);
    game.init();

    // The autoplayer wanders to a random column, then drops
    let mut player = Pcg32::seed_from_u64(SEED ^ 0xa5a5);
    let mut target_x = 0.0f32;
    let mut drops = 0u32;

    while game.time_ticks() < MAX_TICKS && game.phase() == GamePhase::Playing {
        let pending_x = game
            .spawner()
            .pending(game.engine())
            .and_then(|id| game.engine().fruit(id))
            .map(|fruit| fruit.pos.x);

        let intent = match pending_x {
            Some(x) if (target_x - x).abs() > fruit_merge::consts::MOVE_STEP => Intent {
                direction: if target_x > x { 1 } else { -1 },
                drop: false,
            },
            Some(_) => {
                target_x = player.random_range(-4.5..4.5);
                Intent {
                    direction: 0,
                    drop: true,
                }
            }
            None => Intent::default(),
        };
        game.tick(intent);

        for event in game.drain_events() {
            match event {
                GameEvent::Dropped { x, .. } => {
                    drops += 1;
                    log::debug!("Drop #{} at x={:.2}", drops, x);
                }
                GameEvent::Merged(merge) => {
                    log::info!(
                        "Tick {}: merged into tier {} at ({:.2}, {:.2})",
                        game.time_ticks(),
                        merge.tier,
                        merge.pos.x,
                        merge.pos.y
                    );
                }
                GameEvent::GameOver { tick, fruits } => {
                    log::info!("Container overflowed at tick {} with {} fruits", tick, fruits);
                }
                GameEvent::Spawned { .. } => {}
            }
        }
    }

    log::info!(
        "Finished after {} ticks: {} drops, {} merges",
        game.time_ticks(),
        drops,
        game.merges()
    );

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }

    game.dispose();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is fruit_merge::web::start, this is just to satisfy the compiler
}
