//! Binary entity records.
//!
//! Records are packed back to back with no padding, all numbers little-endian:
//!
//! | Offset        | Size | Field             | Description                          |
//! |---------------|------|-------------------|--------------------------------------|
//! | 0             | 4    | Id                | `i32`                                |
//! | 4             | n+1  | Label             | ASCII bytes followed by a NUL        |
//! | 5+n           | 4    | Latitude          | `f32`                                |
//! | 9+n           | 4    | Longitude         | `f32`                                |
//! | 13+n          | 8    | Recorded time     | `u64`, seconds since the Unix epoch  |
//!
//! A buffer must end exactly at the end of its last record.

use crate::api::entity::Entity;
use crate::error::NearestError;
use log::debug;
use std::fs;
use std::path::Path;

/// Iterator over the records of a byte buffer.
///
/// Yields one `Err` and then stops if a record is malformed.
#[derive(Debug, Clone)]
pub struct RecordReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            failed: false,
        }
    }

    fn take<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], NearestError> {
        let end = self.offset + N;
        let chunk: [u8; N] = self
            .bytes
            .get(self.offset..end)
            .and_then(|s| s.try_into().ok())
            .ok_or(NearestError::TruncatedRecord {
                offset: self.offset,
                field,
            })?;
        self.offset = end;
        Ok(chunk)
    }

    fn take_label(&mut self) -> Result<Vec<u8>, NearestError> {
        let start = self.offset;
        let len = self.bytes[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(NearestError::UnterminatedLabel { offset: start })?;
        self.offset = start + len + 1;
        Ok(self.bytes[start..start + len].to_vec())
    }

    fn read_record(&mut self) -> Result<Entity, NearestError> {
        let id = i32::from_le_bytes(self.take::<4>("id")?);
        let label = self.take_label()?;
        let latitude = f32::from_le_bytes(self.take::<4>("latitude")?);
        let longitude = f32::from_le_bytes(self.take::<4>("longitude")?);
        let recorded_time_utc = u64::from_le_bytes(self.take::<8>("recorded time")?);

        Ok(Entity {
            id,
            label,
            latitude,
            longitude,
            recorded_time_utc,
        })
    }
}

impl Iterator for RecordReader<'_> {
    type Item = Result<Entity, NearestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        let record = self.read_record();
        self.failed = record.is_err();
        Some(record)
    }
}

/// Decodes every record in `bytes`. Any malformed record fails the whole batch.
pub fn decode_entities(bytes: &[u8]) -> Result<Vec<Entity>, NearestError> {
    RecordReader::new(bytes).collect()
}

/// Loads a whole record file into memory and decodes it.
pub fn read_entities(path: impl AsRef<Path>) -> Result<Vec<Entity>, NearestError> {
    let bytes = fs::read(path.as_ref())?;
    let entities = decode_entities(&bytes)?;
    debug!(
        "Decoded {} records ({} bytes) from {}",
        entities.len(),
        bytes.len(),
        path.as_ref().display()
    );
    Ok(entities)
}

/// Appends the record for `entity` to `out`.
pub fn encode_entity(entity: &Entity, out: &mut Vec<u8>) -> Result<(), NearestError> {
    if entity.label.contains(&0) {
        return Err(NearestError::LabelContainsNul { id: entity.id });
    }
    out.extend_from_slice(&entity.id.to_le_bytes());
    out.extend_from_slice(&entity.label);
    out.push(0);
    out.extend_from_slice(&entity.latitude.to_le_bytes());
    out.extend_from_slice(&entity.longitude.to_le_bytes());
    out.extend_from_slice(&entity.recorded_time_utc.to_le_bytes());
    Ok(())
}

pub fn encode_entities(entities: &[Entity]) -> Result<Vec<u8>, NearestError> {
    let mut out = Vec::with_capacity(entities.iter().map(|e| e.label.len() + 21).sum());
    for entity in entities {
        encode_entity(entity, &mut out)?;
    }
    Ok(out)
}

/// Writes `entities` as a record file, replacing any existing file.
pub fn write_entities(path: impl AsRef<Path>, entities: &[Entity]) -> Result<(), NearestError> {
    let bytes = encode_entities(entities)?;
    fs::write(path, bytes)?;
    Ok(())
}
