use crate::world::entity::{Entity, Heading, Turn};
use crate::world::weighted::WeightedTable;
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Turn weights out of 100: mostly keep going, occasionally turn or reverse.
const TURN_WEIGHTS: [(u32, Turn); 4] = [
    (70, Turn::Keep),
    (10, Turn::Right),
    (10, Turn::Left),
    (10, Turn::Reverse),
];

/// Toroidal grid holding one random-walking entity per identity.
///
/// Every read and write of the entity map goes through one mutex. The lock is
/// only ever held for a single lookup/update and never across an await.
pub struct World {
    width: u32,
    height: u32,
    entities: Mutex<HashMap<String, Entity>>,
    turns: WeightedTable<Turn>,
}

impl World {
    /// Create an empty world. Zero dimensions are clamped to 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            entities: Mutex::new(HashMap::new()),
            turns: WeightedTable::new(&TURN_WEIGHTS),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Advance the entity for `id` by one step, spawning it on first sight.
    pub fn advance(&self, id: &str) -> Entity {
        self.advance_with(id, &mut rand::thread_rng())
    }

    /// Same as [`World::advance`] with a caller-supplied RNG.
    pub fn advance_with<R: Rng + ?Sized>(&self, id: &str, rng: &mut R) -> Entity {
        let mut entities = self.lock();

        let next = match entities.get(id) {
            None => Entity {
                heading: Heading::random(rng),
                x: rng.gen_range(0..self.width),
                y: rng.gen_range(0..self.height),
            },
            Some(current) => {
                let turn = self.turns.pick(rng).unwrap_or_else(|e| {
                    warn!(entity_id = %id, error = %e, "Unable to pick direction, keeping heading");
                    Turn::Keep
                });
                current.step(turn, self.width, self.height)
            }
        };

        entities.insert(id.to_string(), next);
        next
    }

    /// Get entity by identity
    pub fn get(&self, id: &str) -> Option<Entity> {
        self.lock().get(id).copied()
    }

    /// Drop the entity for a departed identity
    pub fn remove(&self, id: &str) -> Option<Entity> {
        self.lock().remove(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entity>> {
        // Entity values are plain Copy data, so a panic mid-update cannot leave
        // the map half-written; keep serving it.
        self.entities.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(500, 500)
    }
}
