/// Batch flows: load → group → resolve reference → delta → render.
///
/// - `frequency` — frequency curves of HydraNL computations, one chart per
///   location, interpolated deltas against the reference simulation type.
/// - `profile` — longitudinal profiles from viewer exports, one chart per
///   table, exact-join deltas on river-km.
///
/// Both return a `BatchReport`. Per-input failures end up in the report;
/// only configuration problems and (for profiles) a missing reference abort
/// the call.

pub mod frequency;
pub mod profile;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::analysis::reference::ReferenceError;
use crate::config::ConfigError;
use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("cannot determine the parameter of {}: no configured key in the file name", .0.display())]
    ParameterNotInFileName(PathBuf),

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
