//! rbldns application layer: ports implemented by infrastructure, and the
//! zone/lookup services that sit on top of them.
pub mod ports;
pub mod services;
