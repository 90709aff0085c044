/// Comparison configuration loader - parses compare.toml
///
/// Keeps the company folder layout, the naming conventions of the
/// computation directories and the display style of every simulation type
/// out of the code, so that a new variant or a different drive letter does
/// not require recompiling.
///
/// The raw TOML structures are validated once into an immutable
/// `CompareConfig` which is passed explicitly to the flows and the renderer.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::analysis::reference::ReferencePolicy;
use crate::model::LocationType;

/// Configuration file used when neither `--config` nor `HYDRA_COMPARE_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "compare.toml";

/// Environment variable overriding the configuration path.
pub const CONFIG_ENV_VAR: &str = "HYDRA_COMPARE_CONFIG";

/// Legend position given to simulation types missing from `[[series]]`.
pub const FALLBACK_ORDER: u32 = 999;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid company name '{name}', choose one of: {}", known.join(", "))]
    UnknownCompany { name: String, known: Vec<String> },
    #[error("invalid color '{color}' for series '{token}', expected #rrggbb")]
    InvalidColor { token: String, color: String },
    #[error("series token '{0}' is configured more than once")]
    DuplicateSeries(String),
    #[error("parameter key '{0}' is configured more than once")]
    DuplicateParameter(String),
    #[error("reference token for the {0} flow must not be empty")]
    EmptyReference(&'static str),
    #[error("unknown location type '{0}', expected 'as' or 'oever'")]
    UnknownLocationType(String),
    #[error("settings marker must not be empty")]
    EmptyMarker,
}

// ---------------------------------------------------------------------------
// TOML structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    companies: BTreeMap<String, CompanyPaths>,
    #[serde(default)]
    water_systems: WaterSystems,
    #[serde(default)]
    frequency: FrequencyFile,
    #[serde(default)]
    profile: ProfileFile,
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default)]
    series: Vec<SeriesStyleFile>,
}

/// Input and output folders of one company's project drive.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CompanyPaths {
    pub input_root: PathBuf,
    pub output_dir: PathBuf,
}

/// Folder prefix per water system (`HydraNL_Beoordelen_{prefix}_{water_system}`).
#[derive(Debug, Clone, Deserialize)]
pub struct WaterSystems {
    #[serde(default = "default_prefix")]
    pub default_prefix: String,
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
}

impl Default for WaterSystems {
    fn default() -> Self {
        WaterSystems {
            default_prefix: default_prefix(),
            prefixes: BTreeMap::new(),
        }
    }
}

fn default_prefix() -> String {
    "BOR".to_string()
}

#[derive(Debug, Deserialize)]
struct FrequencyFile {
    #[serde(default = "default_frequency_reference")]
    reference: String,
    #[serde(default)]
    reference_policy: ReferencePolicy,
    #[serde(default = "default_marker")]
    settings_marker: String,
    #[serde(default = "default_location_types")]
    location_types: Vec<String>,
    #[serde(default = "default_threshold")]
    upper_range_threshold_years: f64,
    #[serde(default = "default_results_dir")]
    results_dir: String,
    #[serde(default = "default_results_extension")]
    results_extension: String,
}

impl Default for FrequencyFile {
    fn default() -> Self {
        FrequencyFile {
            reference: default_frequency_reference(),
            reference_policy: ReferencePolicy::default(),
            settings_marker: default_marker(),
            location_types: default_location_types(),
            upper_range_threshold_years: default_threshold(),
            results_dir: default_results_dir(),
            results_extension: default_results_extension(),
        }
    }
}

fn default_frequency_reference() -> String {
    "2023-totaal-met".to_string()
}

fn default_marker() -> String {
    "_BI".to_string()
}

fn default_location_types() -> Vec<String> {
    vec!["as".to_string(), "oever".to_string()]
}

fn default_threshold() -> f64 {
    1.0e5
}

fn default_results_dir() -> String {
    "uitvoer".to_string()
}

fn default_results_extension() -> String {
    "txt".to_string()
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default = "default_profile_reference")]
    reference: String,
    #[serde(default)]
    reference_policy: ReferencePolicy,
    #[serde(default = "default_location_column")]
    location_column: String,
    #[serde(default = "default_series_column")]
    series_column: String,
    #[serde(default = "default_x_column")]
    x_column: String,
    #[serde(default = "default_y_column")]
    y_column: String,
}

impl Default for ProfileFile {
    fn default() -> Self {
        ProfileFile {
            reference: default_profile_reference(),
            reference_policy: ReferencePolicy::default(),
            location_column: default_location_column(),
            series_column: default_series_column(),
            x_column: default_x_column(),
            y_column: default_y_column(),
        }
    }
}

fn default_profile_reference() -> String {
    "Defintf".to_string()
}

fn default_location_column() -> String {
    "Locatie (-)".to_string()
}

fn default_series_column() -> String {
    "Serie".to_string()
}

fn default_x_column() -> String {
    "X (m)".to_string()
}

fn default_y_column() -> String {
    "Y (m)".to_string()
}

/// A computed quantity and how to label it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Parameter {
    /// Short key used in directory and file names (`WS`, `HBN`, `Hs`, `Tp`).
    pub key: String,
    /// Column header in the viewer export, also the frequency chart axis label.
    pub column: String,
    /// Lower-case name used in the profile chart labels.
    pub name: String,
    pub unit: String,
    /// Unit of a difference of this parameter.
    pub diff_unit: String,
}

impl Parameter {
    pub fn axis_label(&self) -> &str {
        &self.column
    }

    pub fn profile_label(&self) -> String {
        format!("{} ({})", self.name, self.unit)
    }

    pub fn profile_diff_label(&self) -> String {
        format!("Δ {} ({})", self.name, self.diff_unit)
    }
}

#[derive(Debug, Deserialize)]
struct SeriesStyleFile {
    token: String,
    label: String,
    color: String,
    order: u32,
}

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

/// An sRGB color parsed from `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// How one simulation type is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub token: String,
    pub label: String,
    pub color: Rgb,
    /// Legend position, lowest first.
    pub order: u32,
}

#[derive(Debug, Clone)]
pub struct FrequencySettings {
    pub reference: String,
    pub reference_policy: ReferencePolicy,
    pub settings_marker: String,
    pub location_types: Vec<LocationType>,
    pub upper_range_threshold_years: f64,
    pub results_dir: String,
    pub results_extension: String,
}

#[derive(Debug, Clone)]
pub struct ProfileSettings {
    pub reference: String,
    pub reference_policy: ReferencePolicy,
    pub location_column: String,
    pub series_column: String,
    pub x_column: String,
    pub y_column: String,
}

/// Validated, immutable configuration shared by both flows.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub companies: BTreeMap<String, CompanyPaths>,
    pub water_systems: WaterSystems,
    pub frequency: FrequencySettings,
    pub profile: ProfileSettings,
    pub parameters: Vec<Parameter>,
    pub styles: BTreeMap<String, SeriesStyle>,
}

impl CompareConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        Self::validate(file)
    }

    fn validate(file: ConfigFile) -> Result<Self, ConfigError> {
        if file.frequency.reference.trim().is_empty() {
            return Err(ConfigError::EmptyReference("frequency"));
        }
        if file.profile.reference.trim().is_empty() {
            return Err(ConfigError::EmptyReference("profile"));
        }
        if file.frequency.settings_marker.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }

        let location_types = file
            .frequency
            .location_types
            .iter()
            .map(|t| LocationType::parse(t).ok_or_else(|| ConfigError::UnknownLocationType(t.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen_keys: Vec<&str> = Vec::new();
        for parameter in &file.parameters {
            if seen_keys.contains(&parameter.key.as_str()) {
                return Err(ConfigError::DuplicateParameter(parameter.key.clone()));
            }
            seen_keys.push(&parameter.key);
        }

        let mut styles = BTreeMap::new();
        for entry in file.series {
            let color = Rgb::parse_hex(&entry.color).ok_or_else(|| ConfigError::InvalidColor {
                token: entry.token.clone(),
                color: entry.color.clone(),
            })?;
            if styles.contains_key(&entry.token) {
                return Err(ConfigError::DuplicateSeries(entry.token));
            }
            styles.insert(
                entry.token.clone(),
                SeriesStyle {
                    token: entry.token,
                    label: entry.label,
                    color,
                    order: entry.order,
                },
            );
        }

        Ok(CompareConfig {
            companies: file.companies,
            water_systems: file.water_systems,
            frequency: FrequencySettings {
                reference: file.frequency.reference,
                reference_policy: file.frequency.reference_policy,
                settings_marker: file.frequency.settings_marker,
                location_types,
                upper_range_threshold_years: file.frequency.upper_range_threshold_years,
                results_dir: file.frequency.results_dir,
                results_extension: file.frequency.results_extension,
            },
            profile: ProfileSettings {
                reference: file.profile.reference,
                reference_policy: file.profile.reference_policy,
                location_column: file.profile.location_column,
                series_column: file.profile.series_column,
                x_column: file.profile.x_column,
                y_column: file.profile.y_column,
            },
            parameters: file.parameters,
            styles,
        })
    }

    /// Folders for the named company.
    pub fn company(&self, name: &str) -> Result<&CompanyPaths, ConfigError> {
        self.companies
            .get(name)
            .ok_or_else(|| ConfigError::UnknownCompany {
                name: name.to_string(),
                known: self.companies.keys().cloned().collect(),
            })
    }

    /// `BER` for the Hollandsche IJssel, `BOR` elsewhere (as configured).
    pub fn prefix_for(&self, water_system: &str) -> &str {
        self.water_systems
            .prefixes
            .get(water_system)
            .map(String::as_str)
            .unwrap_or(&self.water_systems.default_prefix)
    }

    /// Directory holding the computations of one location type:
    /// `{input_root}/HydraNL_Beoordelen_{prefix}_{water_system}_{location_type}`.
    pub fn location_type_dir(
        &self,
        input_root: &Path,
        water_system: &str,
        location_type: LocationType,
    ) -> PathBuf {
        input_root.join(format!(
            "HydraNL_Beoordelen_{}_{}_{}",
            self.prefix_for(water_system),
            water_system,
            location_type
        ))
    }

    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.key == key)
    }

    /// First configured parameter whose key occurs in `file_name`.
    pub fn parameter_for_file_name(&self, file_name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| file_name.contains(&p.key))
    }

    /// Style of a simulation type, or a neutral grey entry labelled with the
    /// token itself when it is not configured.
    pub fn style_for(&self, simulation_type: &str) -> SeriesStyle {
        match self.styles.get(simulation_type) {
            Some(style) => style.clone(),
            None => SeriesStyle {
                token: simulation_type.to_string(),
                label: simulation_type.to_string(),
                color: Rgb(128, 128, 128),
                order: FALLBACK_ORDER,
            },
        }
    }

    pub fn is_styled(&self, simulation_type: &str) -> bool {
        self.styles.contains_key(simulation_type)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads and validates the configuration at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CompareConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    CompareConfig::from_toml_str(&contents)
}

/// `HYDRA_COMPARE_CONFIG` if set, otherwise `compare.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
