//! Simulation core of a fixed-timestep 2D arcade shooter: the player's ship
//! ("wings") dodges and shoots falling meteors.
//!
//! - `vector`, `collision`: integer geometry and the GJK box overlap test
//! - `entities`: pure data for lasers, meteors, the ship and the scene
//! - `compute`: spawning, motion, collisions and damage, one tick at a time
//! - `game_loop`: the paced session driver and its platform seams
//! - `dice`, `sprites`, `config`, `error`: supporting pieces

pub mod collision;
pub mod compute;
pub mod config;
pub mod dice;
pub mod entities;
pub mod error;
pub mod game_loop;
pub mod sprites;
pub mod vector;
