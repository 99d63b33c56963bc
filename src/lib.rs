pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    etl::{BatchEngine, BatchReport},
    pipeline::LinePipeline,
    text::{is_plausible_email, normalize_and_reverse, TextPipeline, EMAIL_PATTERN},
};
pub use crate::utils::error::{PipelineError, Result};
