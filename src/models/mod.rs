pub mod auth;
pub mod panel;
pub mod servers;
