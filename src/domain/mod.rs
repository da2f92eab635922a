// Domain layer: record model and the input/output ports. No I/O here.

pub mod model;
pub mod ports;
