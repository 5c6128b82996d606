use wasm_bindgen::prelude::*;

use crate::engine::{ViewerConfig, ViewerEngine};
use crate::input::EditValue;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Browser-facing handle. The host calls `tick` from its animation frame
/// callback and forwards control events through the setters.
#[wasm_bindgen]
pub struct WasmViewer {
    engine: ViewerEngine,
}

#[wasm_bindgen]
impl WasmViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: ViewerEngine::default(),
        }
    }

    /// Build from a JSON config. Falls back to defaults on parse failure.
    pub fn with_config(json: &str) -> Self {
        let config = ViewerConfig::from_json_str(json).unwrap_or_else(|e| {
            log::error!("Failed to parse viewer config: {:#}", e);
            ViewerConfig::default()
        });
        Self {
            engine: ViewerEngine::new(config),
        }
    }

    /// Advance one frame and return the composed frame as JSON.
    pub fn tick(&mut self, dt_ms: f64) -> String {
        let frame = self.engine.tick(dt_ms);
        serde_json::to_string(frame).unwrap_or_else(|e| {
            log::error!("Failed to serialize frame: {}", e);
            String::new()
        })
    }

    pub fn set_number(&mut self, name: &str, value: f32) -> bool {
        self.engine.on_named_edit(name, EditValue::Number(value))
    }

    pub fn set_toggle(&mut self, name: &str, on: bool) -> bool {
        self.engine.on_named_edit(name, EditValue::Toggle(on))
    }

    /// Colour pickers and the shape selector deliver text.
    pub fn set_text(&mut self, name: &str, value: &str) -> bool {
        self.engine.on_raw_edit(name, value)
    }

    pub fn apply_preset(&mut self, name: &str) -> bool {
        self.engine.apply_preset(name)
    }

    pub fn reset_all(&mut self) {
        self.engine.reset_all();
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.engine.toggle_pause()
    }

    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.engine.drag(dx, dy);
    }

    pub fn key(&mut self, key: &str) -> bool {
        self.engine.key_named(key)
    }

    pub fn randomize(&mut self) {
        self.engine.randomize(&mut rand::rng());
    }

    pub fn display_json(&self) -> String {
        serde_json::to_string(&self.engine.display()).unwrap_or_else(|e| {
            log::error!("Failed to serialize display state: {}", e);
            String::new()
        })
    }
}

impl Default for WasmViewer {
    fn default() -> Self {
        Self::new()
    }
}
