//! Manual input adapter.
//!
//! Every UI control delivers `(field, value)` pairs. This module maps those
//! pairs onto the [`ParameterStore`], clamping to the documented slider
//! bounds, wrapping angles and converting percentages. Nothing here fails:
//! mismatched or non-finite values are logged and dropped.

use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::params::{ranges, Axis, ModulatorKind, ParameterStore};
use crate::scene::Shape;

// ============================================================================
// Fields and Values
// ============================================================================

/// Every manually editable parameter, named after its UI control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    RotationX,
    RotationY,
    RotationZ,
    Scale,
    RotationSpeed,
    AutoRotateX,
    AutoRotateY,
    AutoRotateZ,
    FloatAnimation,
    FloatAmplitude,
    PulseAnimation,
    PulseAmplitude,
    ShapeSelect,
    ShapeColor,
    WireframeToggle,
    Metalness,
    Roughness,
    Opacity,
    RainbowMode,
    EnvMap,
    LightColor,
    LightIntensity,
    LightX,
    LightY,
    LightZ,
    LightOrbit,
    AmbientLight,
    ZoomLevel,
    CameraOrbit,
    BgColor,
    FogToggle,
    ShowAxes,
    ShowGrid,
    Particles,
    ParticleColor,
    ParticleSize,
}

impl Field {
    pub const ALL: [Field; 36] = [
        Field::RotationX,
        Field::RotationY,
        Field::RotationZ,
        Field::Scale,
        Field::RotationSpeed,
        Field::AutoRotateX,
        Field::AutoRotateY,
        Field::AutoRotateZ,
        Field::FloatAnimation,
        Field::FloatAmplitude,
        Field::PulseAnimation,
        Field::PulseAmplitude,
        Field::ShapeSelect,
        Field::ShapeColor,
        Field::WireframeToggle,
        Field::Metalness,
        Field::Roughness,
        Field::Opacity,
        Field::RainbowMode,
        Field::EnvMap,
        Field::LightColor,
        Field::LightIntensity,
        Field::LightX,
        Field::LightY,
        Field::LightZ,
        Field::LightOrbit,
        Field::AmbientLight,
        Field::ZoomLevel,
        Field::CameraOrbit,
        Field::BgColor,
        Field::FogToggle,
        Field::ShowAxes,
        Field::ShowGrid,
        Field::Particles,
        Field::ParticleColor,
        Field::ParticleSize,
    ];

    /// Control name as used by the UI.
    pub fn name(&self) -> &'static str {
        match self {
            Field::RotationX => "rotationX",
            Field::RotationY => "rotationY",
            Field::RotationZ => "rotationZ",
            Field::Scale => "scale",
            Field::RotationSpeed => "rotationSpeed",
            Field::AutoRotateX => "autoRotateX",
            Field::AutoRotateY => "autoRotateY",
            Field::AutoRotateZ => "autoRotateZ",
            Field::FloatAnimation => "floatAnimation",
            Field::FloatAmplitude => "floatAmplitude",
            Field::PulseAnimation => "pulseAnimation",
            Field::PulseAmplitude => "pulseAmplitude",
            Field::ShapeSelect => "shapeSelect",
            Field::ShapeColor => "shapeColor",
            Field::WireframeToggle => "wireframeToggle",
            Field::Metalness => "metalness",
            Field::Roughness => "roughness",
            Field::Opacity => "opacity",
            Field::RainbowMode => "rainbowMode",
            Field::EnvMap => "envMap",
            Field::LightColor => "lightColor",
            Field::LightIntensity => "lightIntensity",
            Field::LightX => "lightX",
            Field::LightY => "lightY",
            Field::LightZ => "lightZ",
            Field::LightOrbit => "lightOrbit",
            Field::AmbientLight => "ambientLight",
            Field::ZoomLevel => "zoomLevel",
            Field::CameraOrbit => "cameraOrbit",
            Field::BgColor => "bgColor",
            Field::FogToggle => "fogToggle",
            Field::ShowAxes => "showAxes",
            Field::ShowGrid => "showGrid",
            Field::Particles => "particles",
            Field::ParticleColor => "particleColor",
            Field::ParticleSize => "particleSize",
        }
    }

    /// Look up a field by its control name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// The kind of value this control delivers.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Field::AutoRotateX
            | Field::AutoRotateY
            | Field::AutoRotateZ
            | Field::FloatAnimation
            | Field::PulseAnimation
            | Field::WireframeToggle
            | Field::RainbowMode
            | Field::EnvMap
            | Field::LightOrbit
            | Field::AmbientLight
            | Field::CameraOrbit
            | Field::FogToggle
            | Field::ShowAxes
            | Field::ShowGrid
            | Field::Particles => ValueKind::Toggle,
            Field::ShapeColor
            | Field::LightColor
            | Field::BgColor
            | Field::ParticleColor => ValueKind::Color,
            Field::ShapeSelect => ValueKind::Choice,
            _ => ValueKind::Number,
        }
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Field::from_name(s).ok_or_else(|| anyhow!("unknown field '{}'", s))
    }
}

/// Shape of the value a control delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Toggle,
    Color,
    Choice,
}

/// A value delivered by a UI control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditValue {
    Toggle(bool),
    Number(f32),
    Color(Color),
    Choice(String),
}

impl EditValue {
    /// Parse a raw string according to what `field` expects.
    pub fn parse_for(field: Field, raw: &str) -> Result<Self> {
        let raw = raw.trim();
        match field.value_kind() {
            ValueKind::Number => raw
                .parse::<f32>()
                .map(EditValue::Number)
                .map_err(|e| anyhow!("{} expects a number, got '{}': {}", field.name(), raw, e)),
            ValueKind::Toggle => match raw.to_lowercase().as_str() {
                "true" | "on" | "1" | "yes" => Ok(EditValue::Toggle(true)),
                "false" | "off" | "0" | "no" => Ok(EditValue::Toggle(false)),
                _ => Err(anyhow!("{} expects on/off, got '{}'", field.name(), raw)),
            },
            ValueKind::Color => Ok(EditValue::Color(Color::parse_hex(raw)?)),
            ValueKind::Choice => Ok(EditValue::Choice(raw.to_string())),
        }
    }
}

/// Parse a `field=value` assignment.
pub fn parse_assignment(s: &str) -> Result<(Field, EditValue)> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected field=value, got '{}'", s))?;
    let field: Field = name.trim().parse()?;
    let value = EditValue::parse_for(field, raw)?;
    Ok((field, value))
}

// ============================================================================
// Applying Edits
// ============================================================================

/// Write one manual edit into the store. Returns whether the edit was accepted.
pub fn apply_edit(store: &mut ParameterStore, field: Field, value: &EditValue) -> bool {
    match (field.value_kind(), value) {
        (ValueKind::Number, EditValue::Number(v)) => {
            if !v.is_finite() {
                log::warn!("Ignoring non-finite value for {}", field.name());
                return false;
            }
            apply_number(store, field, *v);
            true
        }
        (ValueKind::Toggle, EditValue::Toggle(on)) => {
            apply_toggle(store, field, *on);
            true
        }
        (ValueKind::Color, EditValue::Color(color)) => {
            apply_color(store, field, *color);
            true
        }
        (ValueKind::Choice, EditValue::Choice(name)) => {
            store.scene.object = Some(Shape::from_name(name));
            true
        }
        _ => {
            log::warn!("Ignoring {:?} for {} (expects {:?})", value, field.name(), field.value_kind());
            false
        }
    }
}

fn apply_number(store: &mut ParameterStore, field: Field, v: f32) {
    match field {
        Field::RotationX => store.pose.set_angle(Axis::X, v),
        Field::RotationY => store.pose.set_angle(Axis::Y, v),
        Field::RotationZ => store.pose.set_angle(Axis::Z, v),
        Field::Scale => store.pose.scale = ranges::clamp(v, ranges::SCALE),
        Field::RotationSpeed => store.rotation_speed = ranges::clamp(v, ranges::ROTATION_SPEED),
        Field::FloatAmplitude => {
            store.modulators.set_magnitude(ModulatorKind::Float, ranges::clamp(v, ranges::FLOAT_AMPLITUDE));
        }
        Field::PulseAmplitude => {
            store.modulators.set_magnitude(ModulatorKind::Pulse, ranges::clamp(v, ranges::PULSE_AMPLITUDE));
        }
        Field::Metalness => store.material.metalness = ranges::clamp(v, ranges::METALNESS),
        Field::Roughness => store.material.roughness = ranges::clamp(v, ranges::ROUGHNESS),
        Field::Opacity => {
            store.material.opacity = ranges::clamp(v, ranges::OPACITY_PERCENT) / 100.0;
        }
        Field::LightIntensity => {
            store.light.intensity = ranges::clamp(v, ranges::LIGHT_INTENSITY);
        }
        Field::LightX => store.light.position.x = ranges::clamp(v, ranges::LIGHT_POSITION),
        Field::LightY => store.light.position.y = ranges::clamp(v, ranges::LIGHT_POSITION),
        Field::LightZ => store.light.position.z = ranges::clamp(v, ranges::LIGHT_POSITION),
        Field::ZoomLevel => store.camera.set_distance(ranges::clamp(v, ranges::ZOOM)),
        Field::ParticleSize => {
            store.scene.particles.size = ranges::clamp(v, ranges::PARTICLE_SIZE);
        }
        other => log::warn!("{} is not a numeric control", other.name()),
    }
}

fn apply_toggle(store: &mut ParameterStore, field: Field, on: bool) {
    let modulators = &mut store.modulators;
    match field {
        Field::AutoRotateX => modulators.set_enabled(ModulatorKind::AutoRotateX, on),
        Field::AutoRotateY => modulators.set_enabled(ModulatorKind::AutoRotateY, on),
        Field::AutoRotateZ => modulators.set_enabled(ModulatorKind::AutoRotateZ, on),
        Field::FloatAnimation => modulators.set_enabled(ModulatorKind::Float, on),
        Field::PulseAnimation => modulators.set_enabled(ModulatorKind::Pulse, on),
        Field::RainbowMode => modulators.set_enabled(ModulatorKind::HueCycle, on),
        Field::LightOrbit => modulators.set_enabled(ModulatorKind::LightOrbit, on),
        Field::CameraOrbit => modulators.set_enabled(ModulatorKind::CameraOrbit, on),
        Field::WireframeToggle => store.material.wireframe = on,
        Field::EnvMap => store.material.env_map = on,
        Field::AmbientLight => store.light.ambient = on,
        Field::FogToggle => store.scene.fog = on,
        Field::ShowAxes => store.scene.show_axes = on,
        Field::ShowGrid => store.scene.show_grid = on,
        Field::Particles => {
            let particles = &mut store.scene.particles;
            // A freshly shown field starts unrotated
            if on && !particles.enabled {
                particles.rotation_y = 0.0;
            }
            particles.enabled = on;
        }
        other => log::warn!("{} is not a toggle", other.name()),
    }
}

fn apply_color(store: &mut ParameterStore, field: Field, color: Color) {
    match field {
        Field::ShapeColor => store.material.base_color = color,
        Field::LightColor => store.light.color = color,
        Field::BgColor => store.scene.background = color,
        Field::ParticleColor => store.scene.particles.color = color,
        other => log::warn!("{} is not a colour control", other.name()),
    }
}

// ============================================================================
// Direct Manipulation
// ============================================================================

/// Keyboard shortcuts understood by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCommand {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    TogglePause,
    Reset,
}

impl KeyCommand {
    /// Map a DOM-style key name.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(KeyCommand::ArrowLeft),
            "ArrowRight" => Some(KeyCommand::ArrowRight),
            "ArrowUp" => Some(KeyCommand::ArrowUp),
            "ArrowDown" => Some(KeyCommand::ArrowDown),
            " " | "Space" => Some(KeyCommand::TogglePause),
            "r" | "R" => Some(KeyCommand::Reset),
            _ => None,
        }
    }

    /// Rotation nudge for arrow keys, `None` for the other commands.
    pub fn rotation_step(&self, step: f32) -> Option<(Axis, f32)> {
        match self {
            KeyCommand::ArrowLeft => Some((Axis::Y, -step)),
            KeyCommand::ArrowRight => Some((Axis::Y, step)),
            KeyCommand::ArrowUp => Some((Axis::X, -step)),
            KeyCommand::ArrowDown => Some((Axis::X, step)),
            KeyCommand::TogglePause | KeyCommand::Reset => None,
        }
    }
}

/// Apply a pointer drag of `(dx, dy)` pixels to the pose.
pub fn apply_drag(store: &mut ParameterStore, dx: f32, dy: f32, sensitivity: f32) {
    if !(dx.is_finite() && dy.is_finite()) {
        return;
    }
    store.pose.rotate_by(Axis::Y, dx * sensitivity);
    store.pose.rotate_by(Axis::X, dy * sensitivity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("nope"), None);
    }

    #[test]
    fn test_serde_names_match_control_names() {
        for field in Field::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.name()));
        }
    }

    #[test]
    fn test_rotation_edits_wrap() {
        let mut store = ParameterStore::default();
        apply_edit(&mut store, Field::RotationX, &EditValue::Number(370.0));
        apply_edit(&mut store, Field::RotationY, &EditValue::Number(-30.0));
        assert_eq!(store.pose.angle(Axis::X), 10.0);
        assert_eq!(store.pose.angle(Axis::Y), 330.0);
    }

    #[test]
    fn test_out_of_range_edits_clamp() {
        let mut store = ParameterStore::default();
        apply_edit(&mut store, Field::Scale, &EditValue::Number(50.0));
        apply_edit(&mut store, Field::Opacity, &EditValue::Number(150.0));
        apply_edit(&mut store, Field::Metalness, &EditValue::Number(-1.0));
        apply_edit(&mut store, Field::ZoomLevel, &EditValue::Number(0.0));
        apply_edit(&mut store, Field::LightX, &EditValue::Number(99.0));
        assert_eq!(store.pose.scale, 3.0);
        assert_eq!(store.material.opacity, 1.0);
        assert_eq!(store.material.metalness, 0.0);
        assert_eq!(store.camera.distance(), 2.0);
        assert_eq!(store.light.position.x, 10.0);
    }

    #[test]
    fn test_amplitude_edits_clamp() {
        let mut store = ParameterStore::default();
        assert!(apply_edit(&mut store, Field::FloatAmplitude, &EditValue::Number(5.0)));
        assert!(apply_edit(&mut store, Field::PulseAmplitude, &EditValue::Number(4.0)));
        assert_eq!(store.modulators.get(ModulatorKind::Float).magnitude, 2.0);
        assert_eq!(store.modulators.get(ModulatorKind::Pulse).magnitude, 0.5);

        apply_edit(&mut store, Field::PulseAmplitude, &EditValue::Number(-3.0));
        assert_eq!(store.modulators.get(ModulatorKind::Pulse).magnitude, 0.0);
    }

    #[test]
    fn test_opacity_percent_sets_transparency() {
        let mut store = ParameterStore::default();
        apply_edit(&mut store, Field::Opacity, &EditValue::Number(40.0));
        assert!((store.material.opacity - 0.4).abs() < 1e-6);
        assert!(store.material.transparent());
    }

    #[test]
    fn test_mismatched_and_non_finite_values_are_dropped() {
        let mut store = ParameterStore::default();
        assert!(!apply_edit(&mut store, Field::Scale, &EditValue::Toggle(true)));
        assert!(!apply_edit(&mut store, Field::Scale, &EditValue::Number(f32::NAN)));
        assert!(!apply_edit(&mut store, Field::AutoRotateX, &EditValue::Number(1.0)));
        assert_eq!(store, ParameterStore::default());
    }

    #[test]
    fn test_toggles_drive_modulator_flags() {
        let mut store = ParameterStore::default();
        apply_edit(&mut store, Field::RainbowMode, &EditValue::Toggle(true));
        apply_edit(&mut store, Field::CameraOrbit, &EditValue::Toggle(true));
        assert!(store.modulators.is_enabled(ModulatorKind::HueCycle));
        assert!(store.modulators.is_enabled(ModulatorKind::CameraOrbit));
        apply_edit(&mut store, Field::RainbowMode, &EditValue::Toggle(false));
        assert!(!store.modulators.is_enabled(ModulatorKind::HueCycle));
    }

    #[test]
    fn test_parse_assignment() {
        let (field, value) = parse_assignment("rotationY=45").unwrap();
        assert_eq!(field, Field::RotationY);
        assert_eq!(value, EditValue::Number(45.0));

        let (field, value) = parse_assignment("autoRotateX=on").unwrap();
        assert_eq!(field, Field::AutoRotateX);
        assert_eq!(value, EditValue::Toggle(true));

        let (_, value) = parse_assignment("bgColor=#000000").unwrap();
        assert_eq!(value, EditValue::Color(Color::BLACK));

        assert!(parse_assignment("rotationY").is_err());
        assert!(parse_assignment("bogus=1").is_err());
        assert!(parse_assignment("scale=big").is_err());
    }

    #[test]
    fn test_shape_select() {
        let mut store = ParameterStore::default();
        store.pose.set_angle(Axis::Y, 42.0);
        apply_edit(&mut store, Field::ShapeSelect, &EditValue::Choice("torus".into()));
        assert_eq!(store.scene.object, Some(Shape::Torus));
        assert_eq!(store.pose.angle(Axis::Y), 42.0);
    }

    #[test]
    fn test_drag_and_keys() {
        let mut store = ParameterStore::default();
        apply_drag(&mut store, 20.0, -10.0, 0.5);
        assert_eq!(store.pose.angle(Axis::Y), 10.0);
        assert_eq!(store.pose.angle(Axis::X), 355.0);

        assert_eq!(KeyCommand::from_key("ArrowLeft"), Some(KeyCommand::ArrowLeft));
        assert_eq!(KeyCommand::from_key(" "), Some(KeyCommand::TogglePause));
        assert_eq!(KeyCommand::from_key("q"), None);
        assert_eq!(KeyCommand::ArrowUp.rotation_step(5.0), Some((Axis::X, -5.0)));
    }
}
