/// Entity types for the shooter. Pure data; the rules live in `compute`.

use crate::sprites::{Sprite, SpriteSet};
use crate::vector::{Rect, Vector2i};

// ── Input ─────────────────────────────────────────────────────────────────────

/// Logical intents sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intents {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Laser {
    pub rect: Rect,
    /// Upward speed in pixels per tick.
    pub velocity: i32,
    /// Animation frame, cycles through `0..LASER_FRAMES`.
    pub frame: usize,
    pub visible: bool,
}

// ── Meteors ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Meteor {
    pub rect: Rect,
    pub vx: i32,
    pub vy: i32,
    /// Hidden meteors keep falling but take part in no collisions.
    pub visible: bool,
    /// Index into the scene's meteor palette.
    pub sprite: usize,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Wings {
    /// Cleared only once the last life is spent.
    pub alive: bool,
    pub health: i32,
    pub lives: i32,
    /// Top-left of the ship sprite.
    pub position: Vector2i,
    /// Vertical stripe first, horizontal stripe second.  Relative to `position`.
    pub hitboxes: [Rect; 2],
    pub sprite: Sprite,
    /// Thruster flame animation frame.
    pub thruster_frame: usize,
}

impl Wings {
    /// Hitbox `i` placed in field coordinates.
    pub fn hitbox(&self, i: usize) -> Rect {
        self.hitboxes[i].offset(self.position)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.sprite.w, self.sprite.h)
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────────

/// Everything that moves besides the player.  The meteor pool is sized at
/// creation and never grows or shrinks.
#[derive(Clone, Debug)]
pub struct Scene {
    pub field: Rect,
    pub meteors: Box<[Meteor]>,
    pub lasers: Vec<Laser>,
    /// `None` means lasers are unbounded.
    pub laser_cap: Option<usize>,
    pub sprites: SpriteSet,
}

impl Scene {
    pub fn visible_meteors(&self) -> impl Iterator<Item = &Meteor> {
        self.meteors.iter().filter(|m| m.visible)
    }

    pub fn meteor_sprite(&self, meteor: &Meteor) -> &Sprite {
        &self.sprites.meteors[meteor.sprite]
    }
}
