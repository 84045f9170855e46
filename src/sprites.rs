/// Sprite handles and the loader seam.
///
/// The simulation only ever reads a sprite's pixel size; decoding and
/// drawing belong to the platform.  A sprite is identified by its asset
/// name and carries the size the loader reported for it.

use std::collections::HashMap;

use crate::error::{GameError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub name: String,
    pub w: i32,
    pub h: i32,
}

/// Resolves an asset name into a sprite.
pub trait SpriteLoader {
    fn load(&self, name: &str) -> Result<Sprite>;
}

pub const BACKGROUND: &str = "img/darkPurple.png";
pub const SHIP: &str = "img/ship.png";

pub const METEORS: [&str; 10] = [
    "img/meteor_tiny1.png",
    "img/meteor_tiny2.png",
    "img/meteor_small1.png",
    "img/meteor_small2.png",
    "img/meteor_med1.png",
    "img/meteor_med3.png",
    "img/meteor_big1.png",
    "img/meteor_big2.png",
    "img/meteor_big3.png",
    "img/meteor_big4.png",
];

pub const DAMAGE_FRAMES: usize = 3;
pub const THRUSTER_FRAMES: usize = 8;
pub const LASER_FRAMES: usize = 7;

pub fn damage_name(i: usize) -> String {
    format!("img/damage{i:02}.png")
}

pub fn thruster_name(i: usize) -> String {
    format!("img/fire{i:02}.png")
}

/// Laser frames are numbered from 1 on disk.
pub fn laser_name(i: usize) -> String {
    format!("img/laserBlue{:02}.png", i + 1)
}

/// Pixel sizes of the stock asset pack.
fn stock_size(name: &str) -> Option<(i32, i32)> {
    let size = match name {
        BACKGROUND => (256, 256),
        SHIP => (99, 75),
        "img/damage00.png" | "img/damage01.png" | "img/damage02.png" => (99, 75),
        "img/laserBlue01.png" => (9, 54),
        "img/laserBlue02.png" | "img/laserBlue03.png" => (13, 37),
        "img/laserBlue04.png" | "img/laserBlue05.png" => (11, 37),
        "img/laserBlue06.png" | "img/laserBlue07.png" => (9, 37),
        "img/meteor_tiny1.png" => (18, 18),
        "img/meteor_tiny2.png" => (16, 15),
        "img/meteor_small1.png" => (28, 28),
        "img/meteor_small2.png" => (29, 26),
        "img/meteor_med1.png" => (43, 43),
        "img/meteor_med3.png" => (45, 40),
        "img/meteor_big1.png" => (101, 84),
        "img/meteor_big2.png" => (120, 98),
        "img/meteor_big3.png" => (89, 82),
        "img/meteor_big4.png" => (98, 96),
        _ if name.starts_with("img/fire") && name.ends_with(".png") => {
            let idx = name["img/fire".len()..name.len() - ".png".len()].parse::<usize>().ok()?;
            if idx >= THRUSTER_FRAMES {
                return None;
            }
            (14, 31)
        }
        _ => return None,
    };
    Some(size)
}

/// Loader backed by the stock size table, with per-name overrides from
/// configuration.
#[derive(Clone, Debug, Default)]
pub struct BuiltinSprites {
    overrides: HashMap<String, (i32, i32)>,
}

impl BuiltinSprites {
    pub fn new(overrides: HashMap<String, (i32, i32)>) -> Self {
        Self { overrides }
    }
}

impl SpriteLoader for BuiltinSprites {
    fn load(&self, name: &str) -> Result<Sprite> {
        let (w, h) = self
            .overrides
            .get(name)
            .copied()
            .or_else(|| stock_size(name))
            .ok_or_else(|| GameError::ResourceLoadFailure { name: name.to_string() })?;
        log::debug!("loaded sprite {name} ({w}x{h})");
        Ok(Sprite { name: name.to_string(), w, h })
    }
}

/// Every sprite a session needs, loaded up front.  Any missing asset
/// aborts the whole set.
#[derive(Clone, Debug)]
pub struct SpriteSet {
    pub background: Sprite,
    pub ship: Sprite,
    pub damages: Vec<Sprite>,
    pub thrusters: Vec<Sprite>,
    pub lasers: Vec<Sprite>,
    pub meteors: Vec<Sprite>,
}

impl SpriteSet {
    pub fn load(loader: &impl SpriteLoader) -> Result<SpriteSet> {
        let load_all = |names: Vec<String>| -> Result<Vec<Sprite>> {
            names.iter().map(|n| loader.load(n)).collect()
        };

        Ok(SpriteSet {
            background: loader.load(BACKGROUND)?,
            ship: loader.load(SHIP)?,
            damages: load_all((0..DAMAGE_FRAMES).map(damage_name).collect())?,
            thrusters: load_all((0..THRUSTER_FRAMES).map(thruster_name).collect())?,
            lasers: load_all((0..LASER_FRAMES).map(laser_name).collect())?,
            meteors: load_all(METEORS.iter().map(|s| s.to_string()).collect())?,
        })
    }
}
