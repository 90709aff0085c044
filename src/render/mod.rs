/// Chart rendering with plotters.
///
/// - `frequency` — water level vs return period, with a difference panel
/// - `profile`   — longitudinal profile vs river-km, difference panel, and
///   the optional location map
///
/// Drawing functions are generic over the plotters backend and return a
/// boxed error; the public entry points open a bitmap file and convert any
/// failure into `RenderError` carrying the target path.

pub mod frequency;
pub mod profile;

use std::path::{Path, PathBuf};

use plotters::style::RGBColor;
use thiserror::Error;

use crate::config::Rgb;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to draw {}: {message}", path.display())]
    Drawing { path: PathBuf, message: String },
}

impl RenderError {
    pub(crate) fn drawing(path: &Path, err: impl std::fmt::Display) -> Self {
        RenderError::Drawing {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

pub(crate) const TITLE_FONT: (&str, u32) = ("sans-serif", 28);
pub(crate) const CAPTION_FONT: (&str, u32) = ("sans-serif", 22);
pub(crate) const LABEL_FONT: (&str, u32) = ("sans-serif", 16);

pub(crate) fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

// ---------------------------------------------------------------------------
// Output names
// ---------------------------------------------------------------------------

/// `TT_{water_system}_{location}_{parameter}.png`
pub fn frequency_chart_path(
    output_dir: &Path,
    water_system: &str,
    location: &str,
    parameter: &str,
) -> PathBuf {
    output_dir.join(format!("TT_{}_{}_{}.png", water_system, location, parameter))
}

/// `LP_{table_stem}.png`
pub fn profile_chart_path(output_dir: &Path, table: &Path) -> PathBuf {
    output_dir.join(format!("LP_{}.png", table_stem(table)))
}

/// `LP_{table_stem}_kaart.png`
pub fn location_map_path(output_dir: &Path, table: &Path) -> PathBuf {
    output_dir.join(format!("LP_{}_kaart.png", table_stem(table)))
}

pub(crate) fn table_stem(table: &Path) -> String {
    table
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "profiel".to_string())
}
