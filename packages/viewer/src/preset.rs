//! Named presets.
//!
//! Each preset is a literal table of control edits applied together on top
//! of the current state. `default` is special: it resets everything.

use serde::Serialize;

use crate::color::Color;
use crate::input::{apply_edit, EditValue, Field};
use crate::params::ParameterStore;

/// The built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Default,
    Sunset,
    Disco,
    Ice,
    Matrix,
    Galaxy,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Default,
        Preset::Sunset,
        Preset::Disco,
        Preset::Ice,
        Preset::Matrix,
        Preset::Galaxy,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" => Some(Preset::Default),
            "sunset" => Some(Preset::Sunset),
            "disco" => Some(Preset::Disco),
            "ice" => Some(Preset::Ice),
            "matrix" => Some(Preset::Matrix),
            "galaxy" => Some(Preset::Galaxy),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Sunset => "sunset",
            Preset::Disco => "disco",
            Preset::Ice => "ice",
            Preset::Matrix => "matrix",
            Preset::Galaxy => "galaxy",
        }
    }

    /// Whether the preset restores defaults instead of layering edits.
    pub fn resets(&self) -> bool {
        matches!(self, Preset::Default)
    }

    /// The field table of this preset. Empty for `default`.
    pub fn table(&self) -> Vec<(Field, EditValue)> {
        use EditValue::{Number, Toggle};

        let hex = |v: u32| EditValue::Color(Color::from_hex_u32(v));
        match self {
            Preset::Default => Vec::new(),
            Preset::Sunset => vec![
                (Field::BgColor, hex(0xff6b35)),
                (Field::LightColor, hex(0xffa500)),
                (Field::AutoRotateY, Toggle(true)),
                (Field::RotationSpeed, Number(0.5)),
            ],
            Preset::Disco => vec![
                (Field::RainbowMode, Toggle(true)),
                (Field::AutoRotateX, Toggle(true)),
                (Field::AutoRotateY, Toggle(true)),
                (Field::AutoRotateZ, Toggle(true)),
                (Field::RotationSpeed, Number(2.0)),
                (Field::LightOrbit, Toggle(true)),
                (Field::Particles, Toggle(true)),
            ],
            Preset::Ice => vec![
                (Field::BgColor, hex(0xe3f2fd)),
                (Field::LightColor, hex(0x00bcd4)),
                (Field::FogToggle, Toggle(true)),
                (Field::Metalness, Number(0.8)),
            ],
            Preset::Matrix => vec![
                (Field::BgColor, hex(0x000000)),
                (Field::LightColor, hex(0x00ff41)),
                (Field::Particles, Toggle(true)),
                (Field::ParticleColor, hex(0x00ff41)),
                (Field::WireframeToggle, Toggle(true)),
                (Field::ShapeColor, hex(0x00ff41)),
                (Field::AutoRotateY, Toggle(true)),
            ],
            Preset::Galaxy => vec![
                (Field::BgColor, hex(0x1a1a2e)),
                (Field::Particles, Toggle(true)),
                (Field::ParticleColor, hex(0x6366f1)),
                (Field::ParticleSize, Number(0.08)),
                (Field::CameraOrbit, Toggle(true)),
                (Field::AutoRotateY, Toggle(true)),
                (Field::RotationSpeed, Number(0.3)),
                (Field::Metalness, Number(0.9)),
                (Field::Roughness, Number(0.1)),
            ],
        }
    }

    /// Apply to `store` in one pass.
    pub fn apply(&self, store: &mut ParameterStore) {
        if self.resets() {
            store.reset_all();
            return;
        }
        for (field, value) in self.table() {
            apply_edit(store, field, &value);
        }
    }
}
