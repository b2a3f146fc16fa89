//! Ports (interfaces) between the application layer and the outside world

pub mod oracle;
pub mod turn_sink;
