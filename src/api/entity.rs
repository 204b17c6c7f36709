use crate::error::NearestError;
use crate::util::coord::Coordinate;
use serde::Serialize;
use std::borrow::Cow;
use std::ops::Index;

/// A positioned record being searched, decoded once and never mutated.
///
/// # Example
///
/// ```
/// use nearest_position::{Coordinate, Entity};
///
/// let entity = Entity::new(1, "AAA111", 34.544909, -102.100843, 1_700_000_000);
/// assert_eq!(entity.label_str(), "AAA111");
/// assert!((entity.latitude() - 34.544909).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Opaque record identifier
    pub id: i32,
    /// ASCII display label, without its NUL terminator
    pub label: Vec<u8>,
    pub latitude: f32,
    pub longitude: f32,
    /// Recording time, seconds since the Unix epoch
    pub recorded_time_utc: u64,
}

impl Entity {
    pub fn new(
        id: i32,
        label: impl Into<Vec<u8>>,
        latitude: f32,
        longitude: f32,
        recorded_time_utc: u64,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            latitude,
            longitude,
            recorded_time_utc,
        }
    }

    /// The label as text. Bytes outside ASCII/UTF-8 are replaced.
    pub fn label_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.label)
    }
}

impl Coordinate for Entity {
    fn latitude(&self) -> f64 {
        self.latitude as f64
    }
    fn longitude(&self) -> f64 {
        self.longitude as f64
    }
}

/// Stable position of an entity inside an [`EntityStore`].
///
/// Indices follow insertion order, which is also the tie-break order of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityIndex(pub usize);

impl EntityIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Arena that owns every entity; grids and results refer to entries by [`EntityIndex`].
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps already decoded entities, rejecting any with a non-finite coordinate.
    pub fn from_entities(entities: Vec<Entity>) -> Result<Self, NearestError> {
        if let Some((index, e)) = entities.iter().enumerate().find(|(_, e)| !e.is_finite()) {
            return Err(NearestError::NonFiniteCoordinate {
                index,
                latitude: e.latitude,
                longitude: e.longitude,
            });
        }
        Ok(Self { entities })
    }

    pub fn push(&mut self, entity: Entity) -> Result<EntityIndex, NearestError> {
        let index = self.entities.len();
        if !entity.is_finite() {
            return Err(NearestError::NonFiniteCoordinate {
                index,
                latitude: entity.latitude,
                longitude: entity.longitude,
            });
        }
        self.entities.push(entity);
        Ok(EntityIndex(index))
    }

    pub fn get(&self, index: EntityIndex) -> Option<&Entity> {
        self.entities.get(index.0)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityIndex, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityIndex(i), e))
    }
}

impl Index<EntityIndex> for EntityStore {
    type Output = Entity;

    fn index(&self, index: EntityIndex) -> &Entity {
        &self.entities[index.0]
    }
}
