//! Song storage.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::types::{NewSong, Song, SongFields};

/// Storage backend for song records.
///
/// Implementations must be safe to share between concurrent requests.
pub trait SongRepository: Send + Sync {
    /// All songs, in no particular order.
    fn list(&self) -> Vec<Song>;

    /// Store a new song under a freshly generated id.
    fn insert(&self, new_song: NewSong) -> Song;

    fn get(&self, id: &Uuid) -> Option<Song>;

    /// Replace every field of an existing song, keeping its id.
    ///
    /// Returns `None` without touching the collection if `id` is absent.
    fn replace(&self, id: &Uuid, fields: SongFields) -> Option<Song>;

    fn remove(&self, id: &Uuid) -> Option<Song>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local song collection.
#[derive(Clone, Default)]
pub struct InMemorySongStore {
    songs: Arc<DashMap<Uuid, Song>>,
}

impl InMemorySongStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SongRepository for InMemorySongStore {
    fn list(&self) -> Vec<Song> {
        self.songs.iter().map(|entry| entry.value().clone()).collect()
    }

    fn insert(&self, new_song: NewSong) -> Song {
        loop {
            let id = Uuid::new_v4();
            // v4 collisions are not expected, but an id must never be reused
            if let Entry::Vacant(slot) = self.songs.entry(id) {
                let song = Song::new(id, new_song);
                slot.insert(song.clone());
                return song;
            }
        }
    }

    fn get(&self, id: &Uuid) -> Option<Song> {
        self.songs.get(id).map(|r| r.value().clone())
    }

    fn replace(&self, id: &Uuid, fields: SongFields) -> Option<Song> {
        let mut entry = self.songs.get_mut(id)?;
        let song = Song::replaced(*id, fields);
        *entry = song.clone();
        Some(song)
    }

    fn remove(&self, id: &Uuid) -> Option<Song> {
        self.songs.remove(id).map(|(_, song)| song)
    }

    fn len(&self) -> usize {
        self.songs.len()
    }
}
