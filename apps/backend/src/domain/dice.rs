//! Dice sources. The engine only ever asks for one face at a time.

use std::collections::VecDeque;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::board::DIE_FACES;

pub trait Dice: Send + Sync {
    /// A value in `1..=6`.
    fn roll(&self) -> u8;
}

/// Uniform die backed by ChaCha8. Seeded dice replay identically.
pub struct RandomDice {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomDice {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl Dice for RandomDice {
    fn roll(&self) -> u8 {
        self.rng.lock().random_range(DIE_FACES)
    }
}

/// Plays back queued faces, then a fixed fallback face.
pub struct ScriptedDice {
    faces: Mutex<VecDeque<u8>>,
    fallback: u8,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: Mutex::new(faces.into_iter().collect()),
            fallback: 1,
        }
    }

    /// Face returned once the script runs dry. Clamped to a real die face.
    pub fn with_fallback(mut self, face: u8) -> Self {
        self.fallback = face.clamp(1, 6);
        self
    }

    pub fn push(&self, faces: impl IntoIterator<Item = u8>) {
        self.faces.lock().extend(faces);
    }

    pub fn remaining(&self) -> usize {
        self.faces.lock().len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&self) -> u8 {
        self.faces
            .lock()
            .pop_front()
            .filter(|f| DIE_FACES.contains(f))
            .unwrap_or(self.fallback)
    }
}
