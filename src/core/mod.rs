pub mod etl;
pub mod pipeline;
pub mod text;

pub use crate::domain::model::{SourceLine, TextRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
