//! Builder configuration.
//!
//! Only layout lives here: offsets decide where generated nodes are placed and never
//! change what the graph computes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::passes::{LightType, PassKey, PassType};

/// Top-level configuration (JSON shape: `{ "layout": { ... } }`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    pub layout: LayoutConfig,
}

/// Vertical offset of each light type inside a pass band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightOffsets {
    pub direct: f32,
    pub indirect: f32,
    pub color: f32,
}

impl Default for LightOffsets {
    fn default() -> Self {
        Self {
            direct: 0.0,
            indirect: -50.0,
            color: -100.0,
        }
    }
}

/// Vertical band offset of each pass type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassBands {
    pub diffuse: f32,
    pub glossy: f32,
    pub transmission: f32,
}

impl Default for PassBands {
    fn default() -> Self {
        Self {
            diffuse: 0.0,
            glossy: -300.0,
            transmission: -600.0,
        }
    }
}

/// Layout table for generated nodes. Points and steps are `(x, y)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Location of the primary source node.
    pub source: (f32, f32),
    /// Horizontal distance from the source to the column of advanced denoise nodes.
    pub denoise_dx: f32,
    pub light_offsets: LightOffsets,
    pub pass_bands: PassBands,
    /// Step from the mean of a combiner's inputs to the combiner itself.
    /// Also used to place the sink after the final result.
    pub combine_step: (f32, f32),
    /// Basic mode: the single denoise node.
    pub basic_denoise: (f32, f32),
    /// Basic mode: the sink.
    pub basic_sink: (f32, f32),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            source: (0.0, 0.0),
            denoise_dx: 300.0,
            light_offsets: LightOffsets::default(),
            pass_bands: PassBands::default(),
            combine_step: (300.0, 0.0),
            basic_denoise: (250.0, 0.0),
            basic_sink: (500.0, 0.0),
        }
    }
}

impl LayoutConfig {
    pub fn light_offset(&self, light: LightType) -> f32 {
        match light {
            LightType::Direct => self.light_offsets.direct,
            LightType::Indirect => self.light_offsets.indirect,
            LightType::Color => self.light_offsets.color,
        }
    }

    pub fn pass_band(&self, pass: PassType) -> f32 {
        match pass {
            PassType::Diffuse => self.pass_bands.diffuse,
            PassType::Glossy => self.pass_bands.glossy,
            PassType::Transmission => self.pass_bands.transmission,
        }
    }

    /// Vertical row (relative to the source) of the denoise chain for `key`.
    pub fn row(&self, key: PassKey) -> f32 {
        self.light_offset(key.light) + self.pass_band(key.pass)
    }

    fn check(&self) -> Result<(), String> {
        let values = [
            ("source.x", self.source.0),
            ("source.y", self.source.1),
            ("denoise_dx", self.denoise_dx),
            ("light_offsets.direct", self.light_offsets.direct),
            ("light_offsets.indirect", self.light_offsets.indirect),
            ("light_offsets.color", self.light_offsets.color),
            ("pass_bands.diffuse", self.pass_bands.diffuse),
            ("pass_bands.glossy", self.pass_bands.glossy),
            ("pass_bands.transmission", self.pass_bands.transmission),
            ("combine_step.x", self.combine_step.0),
            ("combine_step.y", self.combine_step.1),
            ("basic_denoise.x", self.basic_denoise.0),
            ("basic_denoise.y", self.basic_denoise.1),
            ("basic_sink.x", self.basic_sink.0),
            ("basic_sink.y", self.basic_sink.1),
        ];
        if let Some((name, v)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{name} must be finite, got {v}"));
        }

        if !(self.denoise_dx > 0.0) {
            return Err(format!("denoise_dx must be positive, got {}", self.denoise_dx));
        }
        if !(self.combine_step.0 > 0.0) {
            return Err(format!(
                "combine_step x must be positive, got {}",
                self.combine_step.0
            ));
        }

        // Basic mode: source -> denoise -> sink, left to right.
        if !(self.basic_denoise.0 > self.source.0) {
            return Err(format!(
                "basic_denoise x ({}) must be right of source x ({})",
                self.basic_denoise.0, self.source.0
            ));
        }
        if !(self.basic_sink.0 > self.basic_denoise.0) {
            return Err(format!(
                "basic_sink x ({}) must be right of basic_denoise x ({})",
                self.basic_sink.0, self.basic_denoise.0
            ));
        }

        let lights = LightType::ALL.map(|l| self.light_offset(l));
        if has_duplicate(&lights) {
            return Err("light offsets must be distinct".to_string());
        }
        let bands = PassType::ALL.map(|p| self.pass_band(p));
        if has_duplicate(&bands) {
            return Err("pass band offsets must be distinct".to_string());
        }

        let rows: Vec<(PassKey, f32)> = PassKey::all().map(|k| (k, self.row(k))).collect();
        for (i, (a, ra)) in rows.iter().enumerate() {
            if let Some((b, _)) = rows[i + 1..].iter().find(|(_, rb)| rb == ra) {
                return Err(format!(
                    "{:?}/{:?} and {:?}/{:?} share row {ra}",
                    a.pass, a.light, b.pass, b.light
                ));
            }
        }
        Ok(())
    }
}

fn has_duplicate(values: &[f32]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, a)| values[i + 1..].iter().any(|b| a == b))
}

impl DenoiseConfig {
    /// Reject layouts where two denoise chains would share a row.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.validate_at(Path::new("<memory>"))
    }

    fn validate_at(&self, path: &Path) -> Result<(), EngineError> {
        self.layout.check().map_err(|msg| EngineError::InvalidConfig {
            path: path.to_path_buf(),
            msg,
        })
    }

    /// Load and validate a JSON config. Missing keys keep their defaults.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| EngineError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        let cfg: DenoiseConfig =
            serde_json::from_slice(&bytes).map_err(|source| EngineError::Json {
                path: PathBuf::from(path),
                source,
            })?;
        cfg.validate_at(path)?;
        Ok(cfg)
    }
}
