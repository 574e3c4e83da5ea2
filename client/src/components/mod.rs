//! Reusable UI component modules.

pub mod nav_bar;
pub mod route_guard;
