//! Track geometry and pawn movement.
//!
//! Positions are small integers:
//! - `0..=15` are base slots, four per color.
//! - `16..=67` is the shared outer ring (52 cells, wrapping 67 -> 16).
//! - Each color then owns a private six-cell run ending at its finish value.
//!
//! Everything here is pure; the only mutation is [`apply_capture`], which
//! rewrites positions in a pawn slice it is handed.

use serde::{Deserialize, Serialize};

use crate::domain::room::Pawn;

pub const RING_FIRST: u8 = 16;
pub const RING_LAST: u8 = 67;
pub const RING_LEN: u8 = 52;

/// Cells in a home stretch, finish included.
pub const HOME_STRETCH_LEN: u8 = 6;

/// Distance along the ring from a color's start cell to its entry cell.
pub const ENTRY_DISTANCE: u8 = RING_LEN - 1;

/// Highest value `progress` can return (pawn at its finish).
pub const MAX_PROGRESS: u8 = ENTRY_DISTANCE + 1 + HOME_STRETCH_LEN;

pub const SAFE_CELLS: [u8; 4] = [16, 29, 42, 55];
pub const STAR_CELLS: [u8; 4] = [24, 37, 50, 63];

pub const DIE_FACES: std::ops::RangeInclusive<u8> = 1..=6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    /// Join order: the n-th player to join gets `ALL[n]`.
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    pub fn for_seat(seat: usize) -> Option<Color> {
        Self::ALL.get(seat).copied()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }

    pub fn parse(s: &str) -> Option<Color> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// First base slot; the color owns this slot and the next three.
    pub const fn first_base_slot(self) -> u8 {
        match self {
            Color::Red => 0,
            Color::Blue => 4,
            Color::Green => 8,
            Color::Yellow => 12,
        }
    }

    pub const fn start_cell(self) -> u8 {
        match self {
            Color::Red => 16,
            Color::Yellow => 29,
            Color::Green => 42,
            Color::Blue => 55,
        }
    }

    pub const fn finish(self) -> u8 {
        match self {
            Color::Red => 73,
            Color::Blue => 79,
            Color::Green => 85,
            Color::Yellow => 91,
        }
    }

    /// First cell of the private home stretch.
    pub const fn home_first(self) -> u8 {
        self.finish() + 1 - HOME_STRETCH_LEN
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a pawn currently is, relative to its own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Base,
    /// On the outer ring, `distance` cells past its start cell.
    Ring { distance: u8 },
    /// In the home stretch, `step` cells in (1..=5).
    HomeStretch { step: u8 },
    Finished,
}

pub fn is_ring_cell(position: u8) -> bool {
    (RING_FIRST..=RING_LAST).contains(&position)
}

pub fn is_safe_cell(position: u8) -> bool {
    SAFE_CELLS.contains(&position)
}

pub fn is_star_cell(position: u8) -> bool {
    STAR_CELLS.contains(&position)
}

/// Classify a pawn. `None` means the stored position is not one this pawn
/// can legally occupy (another color's stretch, a foreign base slot).
pub fn area(pawn: &Pawn) -> Option<Area> {
    let color = pawn.color;
    let pos = pawn.position;
    if pos == pawn.base_pos {
        return Some(Area::Base);
    }
    if pos == color.finish() {
        return Some(Area::Finished);
    }
    if (color.home_first()..color.finish()).contains(&pos) {
        return Some(Area::HomeStretch {
            step: pos - color.home_first() + 1,
        });
    }
    if is_ring_cell(pos) {
        let distance = (pos + RING_LEN - color.start_cell()) % RING_LEN;
        return Some(Area::Ring { distance });
    }
    None
}

fn ring_cell_at(color: Color, distance: u8) -> u8 {
    let offset = (color.start_cell() - RING_FIRST + distance) % RING_LEN;
    RING_FIRST + offset
}

/// Position the pawn would reach with `roll`, or `None` if the move is not
/// legal (base pawn without a six, overshooting the finish, already home).
pub fn compute_destination(pawn: &Pawn, roll: u8) -> Option<u8> {
    if !DIE_FACES.contains(&roll) {
        return None;
    }
    let color = pawn.color;
    match area(pawn)? {
        Area::Base => (roll == 6).then_some(color.start_cell()),
        Area::Finished => None,
        Area::HomeStretch { .. } => {
            let next = pawn.position + roll;
            (next <= color.finish()).then_some(next)
        }
        Area::Ring { distance } => {
            let travelled = distance + roll;
            if travelled <= ENTRY_DISTANCE {
                Some(ring_cell_at(color, travelled))
            } else {
                let step = travelled - ENTRY_DISTANCE;
                (step <= HOME_STRETCH_LEN).then(|| color.home_first() + step - 1)
            }
        }
    }
}

pub fn can_move(pawn: &Pawn, roll: u8) -> bool {
    compute_destination(pawn, roll).is_some()
}

/// How far along its route a pawn is: 0 in base, then one per cell
/// travelled, up to [`MAX_PROGRESS`] at the finish.
pub fn progress(pawn: &Pawn) -> u8 {
    match area(pawn) {
        Some(Area::Base) | None => 0,
        Some(Area::Ring { distance }) => distance + 1,
        Some(Area::HomeStretch { step }) => ENTRY_DISTANCE + 1 + step,
        Some(Area::Finished) => MAX_PROGRESS,
    }
}

/// Inverse of [`progress`]: the cell a pawn of `color` occupies after
/// travelling `progress` steps. `base_pos` is returned for 0.
pub fn position_for_progress(color: Color, base_pos: u8, progress: u8) -> Option<u8> {
    match progress {
        0 => Some(base_pos),
        p if p <= ENTRY_DISTANCE + 1 => Some(ring_cell_at(color, p - 1)),
        p if p <= MAX_PROGRESS => Some(color.home_first() + (p - ENTRY_DISTANCE - 2)),
        _ => None,
    }
}

/// A pawn sent back to base by a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub pawn_id: u8,
    pub color: Color,
    pub at: u8,
}

/// Send every pawn of another color standing on `position` back to base.
///
/// Nothing is captured on a safe cell. Star cells give no protection.
pub fn apply_capture(pawns: &mut [Pawn], position: u8, moving_color: Color) -> Vec<Capture> {
    if is_safe_cell(position) {
        return Vec::new();
    }
    let mut captured = Vec::new();
    for pawn in pawns
        .iter_mut()
        .filter(|p| p.position == position && p.color != moving_color)
    {
        captured.push(Capture {
            pawn_id: pawn.id,
            color: pawn.color,
            at: position,
        });
        pawn.position = pawn.base_pos;
    }
    captured
}

/// True once every pawn of `color` sits on that color's finish value.
pub fn has_finished(pawns: &[Pawn], color: Color) -> bool {
    let mut own = pawns.iter().filter(|p| p.color == color).peekable();
    own.peek().is_some() && own.all(|p| p.position == color.finish())
}
