// Domain layer: portal address model and the ports the resolver and client talk through.

pub mod model;
pub mod ports;
