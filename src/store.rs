use std::collections::BTreeMap;

use crate::{
    error::{SpriteError, SpriteResult},
    playback::AnimationSettings,
};

/// Opaque handle to a stored animation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RecordId(pub u64);

/// A named animation ready for persistence: encoded frames plus settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationRecord {
    pub name: String,
    /// PNG bytes per frame, in playback order.
    pub frames: Vec<Vec<u8>>,
    pub settings: AnimationSettings,
}

/// The persistence seam. Remote backends live outside this crate; the engine
/// only ever talks to this trait.
pub trait AnimationStore {
    fn save(&mut self, record: AnimationRecord) -> SpriteResult<RecordId>;

    /// All records, optionally filtered to names containing `name_filter`.
    fn list(&self, name_filter: Option<&str>) -> SpriteResult<Vec<(RecordId, AnimationRecord)>>;

    fn delete(&mut self, id: RecordId) -> SpriteResult<()>;
}

/// In-memory reference store with stable iteration order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    next_id: u64,
    records: BTreeMap<RecordId, AnimationRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AnimationStore for MemoryStore {
    fn save(&mut self, record: AnimationRecord) -> SpriteResult<RecordId> {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.records.insert(id, record);
        Ok(id)
    }

    fn list(&self, name_filter: Option<&str>) -> SpriteResult<Vec<(RecordId, AnimationRecord)>> {
        Ok(self
            .records
            .iter()
            .filter(|(_, r)| name_filter.is_none_or(|f| r.name.contains(f)))
            .map(|(id, r)| (*id, r.clone()))
            .collect())
    }

    fn delete(&mut self, id: RecordId) -> SpriteResult<()> {
        if self.records.remove(&id).is_none() {
            return Err(SpriteError::store(format!("no record with id {}", id.0)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Speed;

    fn record(name: &str) -> AnimationRecord {
        AnimationRecord {
            name: name.to_string(),
            frames: vec![vec![1, 2, 3]],
            settings: AnimationSettings {
                speed: Speed::new(12.0).unwrap(),
                looped: true,
                ping_pong: false,
                reverse: false,
            },
        }
    }

    #[test]
    fn save_list_delete_roundtrip() {
        let mut store = MemoryStore::new();
        let a = store.save(record("walk")).unwrap();
        let b = store.save(record("run")).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);

        let all = store.list(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].1.name, "walk");

        store.delete(a).unwrap();
        let rest = store.list(None).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].1.name, "run");
    }

    #[test]
    fn list_filters_by_name_substring() {
        let mut store = MemoryStore::new();
        store.save(record("walk-left")).unwrap();
        store.save(record("walk-right")).unwrap();
        store.save(record("idle")).unwrap();

        let walks = store.list(Some("walk")).unwrap();
        assert_eq!(walks.len(), 2);
        assert!(store.list(Some("jump")).unwrap().is_empty());
    }

    #[test]
    fn delete_unknown_id_is_an_error() {
        let mut store = MemoryStore::new();
        assert!(store.delete(RecordId(42)).is_err());
    }

    #[test]
    fn record_json_roundtrip() {
        let rec = record("walk");
        let s = serde_json::to_string(&rec).unwrap();
        let de: AnimationRecord = serde_json::from_str(&s).unwrap();
        assert_eq!(de, rec);
    }
}
