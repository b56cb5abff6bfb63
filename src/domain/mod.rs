// Domain layer: records, raw provider payloads, the name list and the ports.

pub mod model;
pub mod names;
pub mod ports;
pub mod raw;
