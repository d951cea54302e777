//! Pasture library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) runs the simulation headless. Renderers,
//! audio and UI live outside this crate: they read `cows::HerdFrame` and the
//! `Farm` resource and drive the game through the request events in `shared`.

pub mod shared;
pub mod rng;
pub mod cows;
pub mod economy;
pub mod save;
pub mod data;
