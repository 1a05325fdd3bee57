//! Optional TOML configuration layered beneath command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use grid_explorer_world::generation::GenerationSettings;
use serde::Deserialize;

/// Default number of map columns and rows.
pub(crate) const DEFAULT_MAP_EXTENT: u32 = 30;
/// Default number of visible columns and rows.
pub(crate) const DEFAULT_VIEWPORT_EXTENT: u32 = 10;

/// Contents of a configuration file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) seed: Option<u64>,
    pub(crate) map: Extent,
    pub(crate) viewport: Extent,
    pub(crate) generation: GenerationOverrides,
}

/// Width and height pair shared by the `[map]` and `[viewport]` tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Extent {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
}

/// Partial generation settings; missing keys keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GenerationOverrides {
    water_chance: Option<f64>,
    mountain_chance: Option<f64>,
    spread_passes: Option<u32>,
    spread_factor: Option<f64>,
    sand_chance: Option<f64>,
    wood_chance: Option<f64>,
    stone_chance: Option<f64>,
}

impl GenerationOverrides {
    /// Generation settings with every present key applied over the defaults.
    pub(crate) fn resolve(&self) -> GenerationSettings {
        let defaults = GenerationSettings::default();
        GenerationSettings {
            water_chance: self.water_chance.unwrap_or(defaults.water_chance),
            mountain_chance: self.mountain_chance.unwrap_or(defaults.mountain_chance),
            spread_passes: self.spread_passes.unwrap_or(defaults.spread_passes),
            spread_factor: self.spread_factor.unwrap_or(defaults.spread_factor),
            sand_chance: self.sand_chance.unwrap_or(defaults.sand_chance),
            wood_chance: self.wood_chance.unwrap_or(defaults.wood_chance),
            stone_chance: self.stone_chance.unwrap_or(defaults.stone_chance),
        }
    }
}

/// Reads and parses the configuration file at `path`.
pub(crate) fn load(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    parse(&contents)
        .with_context(|| format!("failed to parse configuration at {}", path.display()))
}

fn parse(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).context("invalid configuration toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("").expect("empty config parses");
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.generation.resolve(), GenerationSettings::default());
    }

    #[test]
    fn sections_override_individual_keys() {
        let config = parse(
            r#"
            seed = 42

            [map]
            width = 40

            [viewport]
            height = 8

            [generation]
            water_chance = 0.1
            spread_passes = 2
            "#,
        )
        .expect("valid config");

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.map.width, Some(40));
        assert_eq!(config.map.height, None);
        assert_eq!(config.viewport.height, Some(8));

        let settings = config.generation.resolve();
        assert_eq!(settings.water_chance, 0.1);
        assert_eq!(settings.spread_passes, 2);
        assert_eq!(settings.sand_chance, GenerationSettings::default().sand_chance);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("[map]\ndepth = 3\n").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load(Path::new("does/not/exist.toml")).expect_err("missing file");
        assert!(format!("{error:#}").contains("does/not/exist.toml"));
    }
}
