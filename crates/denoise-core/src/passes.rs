//! The fixed render pass enumeration.
//!
//! Every (pass, light) combination maps to exactly one source socket through [`PASS_TABLE`].
//! Names are looked up, never composed at runtime.

/// Main source socket carrying the raw, noisy render.
pub const NOISY_IMAGE: &str = "NoisyImage";
/// Auxiliary normal buffer stored alongside the denoising data.
pub const DENOISING_NORMAL: &str = "DenoisingNormal";
/// Auxiliary albedo buffer stored alongside the denoising data.
pub const DENOISING_ALBEDO: &str = "DenoisingAlbedo";

/// Material response a pass was rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PassType {
    Diffuse,
    Glossy,
    Transmission,
}

impl PassType {
    pub const ALL: [PassType; 3] = [PassType::Diffuse, PassType::Glossy, PassType::Transmission];

    pub fn abbrev(self) -> &'static str {
        match self {
            PassType::Diffuse => "Diff",
            PassType::Glossy => "Gloss",
            PassType::Transmission => "Trans",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Subdivision of a pass into its lighting components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LightType {
    Direct,
    Indirect,
    Color,
}

impl LightType {
    pub const ALL: [LightType; 3] = [LightType::Direct, LightType::Indirect, LightType::Color];

    pub fn abbrev(self) -> &'static str {
        match self {
            LightType::Direct => "Dir",
            LightType::Indirect => "Ind",
            LightType::Color => "Col",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One of the nine raw per-pass contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassKey {
    pub pass: PassType,
    pub light: LightType,
}

impl PassKey {
    pub const fn new(pass: PassType, light: LightType) -> Self {
        Self { pass, light }
    }

    /// Name of the source socket that carries this contribution.
    pub fn socket_name(self) -> &'static str {
        PASS_TABLE[self.pass.index() * 3 + self.light.index()].1
    }

    /// All nine keys, pass-major.
    pub fn all() -> impl Iterator<Item = PassKey> {
        PASS_TABLE.iter().map(|(key, _)| *key)
    }
}

/// PassType × LightType → source socket name, pass-major.
pub const PASS_TABLE: [(PassKey, &str); 9] = [
    (PassKey::new(PassType::Diffuse, LightType::Direct), "DiffDir"),
    (PassKey::new(PassType::Diffuse, LightType::Indirect), "DiffInd"),
    (PassKey::new(PassType::Diffuse, LightType::Color), "DiffCol"),
    (PassKey::new(PassType::Glossy, LightType::Direct), "GlossDir"),
    (PassKey::new(PassType::Glossy, LightType::Indirect), "GlossInd"),
    (PassKey::new(PassType::Glossy, LightType::Color), "GlossCol"),
    (PassKey::new(PassType::Transmission, LightType::Direct), "TransDir"),
    (PassKey::new(PassType::Transmission, LightType::Indirect), "TransInd"),
    (PassKey::new(PassType::Transmission, LightType::Color), "TransCol"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_follow_abbreviations() {
        for (key, name) in PASS_TABLE {
            let expected = format!("{}{}", key.pass.abbrev(), key.light.abbrev());
            assert_eq!(name, expected);
            assert_eq!(key.socket_name(), name);
        }
    }

    #[test]
    fn all_keys_are_distinct() {
        let keys: std::collections::HashSet<PassKey> = PassKey::all().collect();
        assert_eq!(keys.len(), 9);
    }
}
