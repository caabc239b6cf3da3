// Domain layer: catalog models and the ports the transfer pipeline talks through.

pub mod model;
pub mod ports;
