//! Browser bindings
//!
//! The page owns the canvas and the `requestAnimationFrame` loop. It forwards
//! key codes, calls `frame` with the rAF timestamp, and draws whatever
//! `snapshot_json` returns.

use wasm_bindgen::prelude::*;

use crate::consts::*;
use crate::game::Game;
use crate::input::Key;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Fruit Merge (web) starting...");
}

/// Game instance handed to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    accumulator: f32,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WebGame {
        let mut game = Game::new(seed);
        game.init();
        WebGame {
            game,
            accumulator: 0.0,
            last_time: None,
        }
    }

    /// Restart with the same seed
    pub fn restart(&mut self) {
        self.game.init();
        self.accumulator = 0.0;
    }

    pub fn key_down(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.game.input_mut().key_down(key);
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.game.input_mut().key_up(key);
        }
    }

    /// Window lost focus: release held keys
    pub fn blur(&mut self) {
        self.game.input_mut().clear();
    }

    /// Run the ticks owed since the last frame. `time_ms` is the rAF timestamp.
    /// Returns how many ticks ran.
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time.replace(time_ms) {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.game.update();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Current frame as JSON (fruits, next fruit, phase)
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events since the last call, as a JSON array
    pub fn events_json(&mut self) -> Result<String, JsValue> {
        let events = self.game.drain_events();
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Name of the upcoming fruit
    pub fn next_fruit_name(&self) -> String {
        crate::sim::catalog::kind(self.game.next_tier()).name.to_string()
    }

    pub fn is_game_over(&self) -> bool {
        self.game.phase() == crate::game::GamePhase::GameOver
    }

    pub fn dispose(&mut self) {
        self.game.dispose();
        log::info!("Disposed");
    }
}
