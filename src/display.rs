/// Rendering layer: all terminal output lives here.
///
/// The simulation runs in a logical pixel field; this module scales that
/// field onto the terminal's cell grid.  Row 0 is the HUD, the last row the
/// controls hint, everything in between is play area.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use wings::compute::damage_overlay;
use wings::entities::{Laser, Meteor, Scene, Wings};
use wings::error::Result;
use wings::game_loop::{Frame, FrameSink};
use wings::vector::Rect;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_HEALTH: Color = Color::Green;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LASERS: Color = Color::Cyan;
const C_METEOR: Color = Color::DarkYellow;
const C_LASER: Color = Color::Blue;
const C_THRUSTER: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Ship colour by damage overlay level.
const C_SHIP: [Color; 4] = [Color::White, Color::Yellow, Color::DarkYellow, Color::Red];

const THRUSTER_GLYPHS: [&str; 8] = ["▾", "▿", "▾", "▼", "▾", "▿", "▾", "▼"];

// ── Cell mapping ──────────────────────────────────────────────────────────────

/// Field-to-terminal scaling for one frame.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    field_w: i32,
    field_h: i32,
    cols: i32,
    rows: i32,
}

impl Viewport {
    fn new(field: &Rect, cols: u16, rows: u16) -> Self {
        Self {
            field_w: field.w.max(1),
            field_h: field.h.max(1),
            cols: i32::from(cols),
            // HUD above, hint below
            rows: i32::from(rows).saturating_sub(2).max(1),
        }
    }

    fn col(&self, x: i32) -> i32 {
        x * self.cols / self.field_w
    }

    fn row(&self, y: i32) -> i32 {
        y * self.rows / self.field_h + 1
    }

    /// Cells covered by `rect`, clipped to the play area.  At least one
    /// cell for anything on screen.
    fn cells(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let c0 = self.col(rect.x);
        let c1 = self.col(rect.x + rect.w).max(c0 + 1);
        let r0 = self.row(rect.y);
        let r1 = self.row(rect.y + rect.h).max(r0 + 1);

        let (c0, c1) = (c0.max(0), c1.min(self.cols));
        let (r0, r1) = (r0.max(1), r1.min(self.rows + 1));
        if c0 >= c1 || r0 >= r1 {
            return None;
        }
        Some((c0 as u16, r0 as u16, (c1 - c0) as u16, (r1 - r0) as u16))
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> FrameSink for TerminalRenderer<W> {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        render(&mut self.out, frame, cols, rows)?;
        Ok(())
    }
}

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    frame: &Frame<'_>,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let view = Viewport::new(&frame.scene.field, cols, rows);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, frame, cols)?;

    for meteor in frame.scene.visible_meteors() {
        draw_meteor(out, &view, frame.scene, meteor)?;
    }
    for laser in frame.scene.lasers.iter().filter(|l| l.visible) {
        draw_laser(out, &view, laser)?;
    }

    draw_wings(out, &view, frame.wings)?;
    draw_controls_hint(out, rows)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, frame: &Frame<'_>, cols: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("Health:{:>4}", frame.wings.health)))?;

    let lasers = format!("Lasers:{:>3}", frame.scene.lasers.len());
    let lx = (cols / 2).saturating_sub(lasers.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LASERS))?;
    out.queue(Print(&lasers))?;

    let lives = format!("Lives:{}", "♥".repeat(frame.wings.lives.max(0) as usize));
    let rx = cols.saturating_sub(lives.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn fill<W: Write>(out: &mut W, cells: (u16, u16, u16, u16), glyph: &str) -> std::io::Result<()> {
    let (c, r, w, h) = cells;
    let line = glyph.repeat(w as usize);
    for row in r..r + h {
        out.queue(cursor::MoveTo(c, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn draw_meteor<W: Write>(
    out: &mut W,
    view: &Viewport,
    scene: &Scene,
    meteor: &Meteor,
) -> std::io::Result<()> {
    let Some(cells) = view.cells(&meteor.rect) else {
        return Ok(());
    };
    // Bigger rocks read as denser blocks.
    let glyph = match scene.meteor_sprite(meteor).w {
        0..=20 => "·",
        21..=50 => "▒",
        _ => "█",
    };
    out.queue(style::SetForegroundColor(C_METEOR))?;
    fill(out, cells, glyph)
}

fn draw_laser<W: Write>(out: &mut W, view: &Viewport, laser: &Laser) -> std::io::Result<()> {
    let Some(cells) = view.cells(&laser.rect) else {
        return Ok(());
    };
    let glyph = if laser.frame % 2 == 0 { "║" } else { "│" };
    out.queue(style::SetForegroundColor(C_LASER))?;
    fill(out, cells, glyph)
}

fn draw_wings<W: Write>(out: &mut W, view: &Viewport, wings: &Wings) -> std::io::Result<()> {
    let bounds = wings.bounds();
    let Some((c, r, w, h)) = view.cells(&bounds) else {
        return Ok(());
    };

    let color = C_SHIP[damage_overlay(wings).map_or(0, |level| level + 1)];
    out.queue(style::SetForegroundColor(color))?;

    //   ▲      nose
    //  ◢█◣     fuselage and wings, repeated for taller ships
    let nose = c + w / 2;
    out.queue(cursor::MoveTo(nose, r))?;
    out.queue(Print("▲"))?;
    if h > 1 || w > 2 {
        let body = if w >= 3 {
            format!("◢{}◣", "█".repeat(w as usize - 2))
        } else {
            "█".repeat(w as usize)
        };
        for row in (r + 1)..(r + h.max(2)) {
            out.queue(cursor::MoveTo(c, row))?;
            out.queue(Print(&body))?;
        }
    }

    let flame_row = r + h.max(2);
    if i32::from(flame_row) <= view.rows {
        out.queue(cursor::MoveTo(nose, flame_row))?;
        out.queue(style::SetForegroundColor(C_THRUSTER))?;
        out.queue(Print(THRUSTER_GLYPHS[wings.thruster_frame % THRUSTER_GLYPHS.len()]))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←↑↓→ / WASD : Move   SPACE : Fire   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

pub fn draw_game_over<W: Write>(out: &mut W, ticks: u64) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let lines: [(String, Color); 4] = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Survived {ticks} ticks. Press any key"), Color::White),
    ];

    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_scales_field_onto_play_rows() {
        let view = Viewport::new(&Rect::new(0, 0, 1024, 768), 128, 50);
        assert_eq!(view.col(512), 64);
        assert_eq!(view.row(0), 1);
        assert_eq!(view.row(768), 49);
    }

    #[test]
    fn offscreen_rect_has_no_cells() {
        let view = Viewport::new(&Rect::new(0, 0, 1024, 768), 128, 50);
        assert_eq!(view.cells(&Rect::new(0, -200, 20, 50)), None);
        assert!(view.cells(&Rect::new(10, 10, 1, 1)).is_some());
    }
}
