pub mod agents;
pub mod browser;
pub mod devices;
pub mod panel;
pub mod serialize;
pub mod spider;
pub mod types;
