// Domain layer: data model and ports (interfaces) shared by the batch pipeline.

pub mod model;
pub mod ports;
