// Domain layer: auction inputs and the signal port. No I/O.

pub mod model;
pub mod ports;
