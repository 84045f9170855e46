/// Game-logic functions: placement, motion, collisions, damage.
///
/// Everything here mutates the scene and player in place and draws its
/// randomness from an injected `Dice`, so a seeded generator makes a whole
/// session reproducible.

use crate::collision::collides;
use crate::dice::Dice;
use crate::entities::{Intents, Laser, Meteor, Scene, Wings};
use crate::sprites::{Sprite, SpriteSet, DAMAGE_FRAMES, LASER_FRAMES, THRUSTER_FRAMES};
use crate::vector::{Rect, Vector2i};

// ── Tuning ────────────────────────────────────────────────────────────────────

/// One meteor per cell of this size.
pub const METEOR_CELL_W: i32 = 256;
pub const METEOR_CELL_H: i32 = 192;

pub const MOVE_STEP: i32 = 10;
pub const LASER_SPEED: i32 = 5;
pub const FULL_HEALTH: i32 = 100;
pub const HIT_DAMAGE: i32 = 30;

/// Width of the vertical hitbox stripe.
const STRIPE_W: i32 = 10;

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn meteor_count(field: &Rect) -> usize {
    let cols = field.w / METEOR_CELL_W;
    let rows = field.h / METEOR_CELL_H;
    (cols.max(0) * rows.max(0)) as usize
}

/// Fill the field grid with one meteor per cell, each at a random offset
/// inside its cell.  Roughly half start out visible.
pub fn init_meteors(field: &Rect, palette: &[Sprite], dice: &mut impl Dice) -> Box<[Meteor]> {
    let cols = field.w / METEOR_CELL_W;
    (0..meteor_count(field) as i32)
        .map(|i| {
            let sprite = dice.roll(palette.len() as u32) as usize;

            let vy = dice.roll(5) + 1;
            let mut vx = dice.roll(3) + 1;
            if dice.roll(2) == 0 {
                vx = -vx;
            }

            let x = dice.roll(128) + (i % cols) * METEOR_CELL_W;
            let y = dice.roll(96) + (i / cols) * METEOR_CELL_H;

            Meteor {
                rect: Rect::new(x, y, palette[sprite].w, palette[sprite].h),
                vx,
                vy,
                visible: dice.roll(100) % 2 == 1,
                sprite,
            }
        })
        .collect()
}

pub fn init_scene(
    field: Rect,
    sprites: SpriteSet,
    laser_cap: Option<usize>,
    dice: &mut impl Dice,
) -> Scene {
    let meteors = init_meteors(&field, &sprites.meteors, dice);
    log::info!(
        "scene {}x{}: {} meteors, laser cap {:?}",
        field.w,
        field.h,
        meteors.len(),
        laser_cap
    );
    Scene {
        field,
        meteors,
        lasers: Vec::new(),
        laser_cap,
        sprites,
    }
}

/// Centered horizontally, just below the middle of the field.
pub fn start_position(field: &Rect, ship: &Sprite) -> Vector2i {
    Vector2i::new((field.w - ship.w) / 2, field.h / 2 + ship.h)
}

pub fn init_wings(ship: Sprite, field: &Rect, lives: i32) -> Wings {
    let hitboxes = [
        Rect::new(ship.w / 2 - STRIPE_W, 0, STRIPE_W, ship.h),
        Rect::new(0, ship.h / 2, ship.w, ship.h / 2),
    ];
    Wings {
        alive: true,
        health: FULL_HEALTH,
        lives,
        position: start_position(field, &ship),
        hitboxes,
        sprite: ship,
        thruster_frame: 0,
    }
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Held directions each move a full step; diagonals are not normalised.
pub fn move_wings(wings: &mut Wings, intents: &Intents) {
    if intents.up {
        wings.position.y -= MOVE_STEP;
    }
    if intents.down {
        wings.position.y += MOVE_STEP;
    }
    if intents.left {
        wings.position.x -= MOVE_STEP;
    }
    if intents.right {
        wings.position.x += MOVE_STEP;
    }
}

/// Spawn a laser just above the ship's nose.  Returns `false` when the
/// laser cap is already reached.
pub fn fire_laser(scene: &mut Scene, wings: &Wings) -> bool {
    if scene.laser_cap.is_some_and(|cap| scene.lasers.len() >= cap) {
        log::debug!("laser cap {:?} reached", scene.laser_cap);
        return false;
    }
    let sprite = &scene.sprites.lasers[0];
    let rect = Rect::new(
        wings.position.x + (wings.sprite.w - sprite.w) / 2,
        wings.position.y - sprite.h,
        sprite.w,
        sprite.h,
    );
    scene.lasers.push(Laser {
        rect,
        velocity: LASER_SPEED,
        frame: 0,
        visible: true,
    });
    true
}

// ── Motion ───────────────────────────────────────────────────────────────────

/// Move lasers up, step their animation, and drop any whose top edge has
/// left the field.  Returns how many were dropped.
pub fn update_lasers(scene: &mut Scene) -> usize {
    let before = scene.lasers.len();
    scene.lasers.retain_mut(|laser| {
        laser.frame = (laser.frame + 1) % LASER_FRAMES;
        laser.rect.y -= laser.velocity;
        laser.rect.y >= 0
    });
    before - scene.lasers.len()
}

/// Put a meteor that fell out of the field back on top of its own lane.
/// Horizontal drift is kept.
pub fn respawn_meteor(meteor: &mut Meteor, palette: &[Sprite], dice: &mut impl Dice) {
    let lane = meteor.rect.x / METEOR_CELL_W;

    meteor.rect.x = dice.roll(128) + lane * METEOR_CELL_W;
    meteor.rect.y = -meteor.rect.h;
    meteor.vy = dice.roll(3) + 1;
    meteor.visible = dice.roll(100) % 2 == 0;
    meteor.sprite = dice.roll(palette.len() as u32) as usize;
}

/// Advance every meteor; recycle the ones whose top edge passed the
/// bottom of the field.  Returns how many were recycled.
pub fn update_meteors(scene: &mut Scene, dice: &mut impl Dice) -> usize {
    let bottom = scene.field.h;
    let mut respawned = 0;
    for meteor in scene.meteors.iter_mut() {
        meteor.rect.y += meteor.vy;
        meteor.rect.x += meteor.vx;

        if meteor.rect.y > bottom {
            respawn_meteor(meteor, &scene.sprites.meteors, dice);
            respawned += 1;
        }
    }
    respawned
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Lasers vs visible meteors.  Every laser touching a visible meteor is
/// destroyed and the meteor is hidden.  Returns how many lasers were spent.
pub fn collide_lasers(scene: &mut Scene) -> usize {
    let mut spent = 0;
    for meteor in scene.meteors.iter_mut().filter(|m| m.visible) {
        let before = scene.lasers.len();
        scene.lasers.retain(|laser| !collides(&laser.rect, &meteor.rect));
        let hits = before - scene.lasers.len();
        if hits > 0 {
            meteor.visible = false;
            spent += hits;
        }
    }
    spent
}

/// What a meteor strike did to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Damage {
    /// Health dropped but stayed above zero.
    Hit,
    /// Health ran out; a spare life was used.
    Respawned,
    /// Health ran out with no lives left.
    Destroyed,
}

/// Apply one meteor hit.  On running out of health the player is
/// recentred with full health if a life remains, otherwise killed.
pub fn damage_wings(wings: &mut Wings, field: &Rect) -> Damage {
    wings.health = (wings.health - HIT_DAMAGE).max(0);
    if wings.health > 0 {
        return Damage::Hit;
    }

    if wings.lives > 0 {
        wings.lives -= 1;
        wings.health = FULL_HEALTH;
        wings.position = start_position(field, &wings.sprite);
        log::info!("wings respawned, {} lives left", wings.lives);
        Damage::Respawned
    } else {
        wings.alive = false;
        log::info!("wings destroyed");
        Damage::Destroyed
    }
}

/// Player hitboxes vs visible meteors.  The vertical stripe is tested
/// first; a meteor that hit it is not tested against the second stripe.
/// Running out of health ends the pass for this tick.
pub fn collide_wings(scene: &mut Scene, wings: &mut Wings) -> Vec<Damage> {
    let mut hits = Vec::new();
    for meteor in scene.meteors.iter_mut().filter(|m| m.visible) {
        let struck = (0..wings.hitboxes.len()).any(|i| collides(&wings.hitbox(i), &meteor.rect));
        if !struck {
            continue;
        }

        meteor.visible = false;
        let damage = damage_wings(wings, &scene.field);
        log::debug!("wings hit, health {} ({:?})", wings.health, damage);
        hits.push(damage);
        if damage != Damage::Hit {
            break;
        }
    }
    hits
}

// ── Per-tick step ────────────────────────────────────────────────────────────

/// Counters from one tick, for logging and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fired: bool,
    pub lasers_culled: usize,
    pub meteors_respawned: usize,
    pub lasers_spent: usize,
    pub wings_hits: Vec<Damage>,
}

/// Advance the simulation by one tick.  The order is fixed: collisions
/// are tested against post-motion positions.
pub fn tick(
    scene: &mut Scene,
    wings: &mut Wings,
    intents: &Intents,
    dice: &mut impl Dice,
) -> TickReport {
    move_wings(wings, intents);

    let fired = intents.fire && fire_laser(scene, wings);
    let lasers_culled = update_lasers(scene);
    let meteors_respawned = update_meteors(scene, dice);

    let lasers_spent = collide_lasers(scene);
    let wings_hits = collide_wings(scene, wings);

    TickReport {
        fired,
        lasers_culled,
        meteors_respawned,
        lasers_spent,
        wings_hits,
    }
}

// ── Render-side animation ────────────────────────────────────────────────────

pub fn advance_thruster(wings: &mut Wings) {
    wings.thruster_frame = (wings.thruster_frame + 1) % THRUSTER_FRAMES;
}

/// Which damage overlay to draw, if any.
pub fn damage_overlay(wings: &Wings) -> Option<usize> {
    if wings.health == FULL_HEALTH {
        return None;
    }
    let level = ((FULL_HEALTH - wings.health) / HIT_DAMAGE) as usize;
    Some(level.min(DAMAGE_FRAMES - 1))
}
