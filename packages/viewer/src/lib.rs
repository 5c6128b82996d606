pub mod camera;
pub mod clock;
pub mod color;
pub mod input;
pub mod lighting;
pub mod material;
pub mod params;
pub mod scene;

// Composition pipeline
pub mod modulator;
pub mod composer;
pub mod frame;
pub mod engine;

// UI contract
pub mod preset;
pub mod sync;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
