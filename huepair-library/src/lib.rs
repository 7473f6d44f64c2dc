use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::{DateTime, Utc};
use huepair_core::{Palette, PairingGroup, RgbColor, Theory, ToneVariant};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

const COLLECTION_NAME: &str = "saved_palettes";
const SUBSCRIBER_CAPACITY: usize = 16;

pub type Result<T> = std::result::Result<T, LibraryError>;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Palette {0} not found")]
    NotFound(i64),
}

/// Whose palettes: one collection per app and user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub app_id: String,
    pub user_id: String,
}

impl Scope {
    pub fn new(app_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn collection_path(&self) -> String {
        format!(
            "artifacts/{}/users/{}/{}",
            self.app_id, self.user_id, COLLECTION_NAME
        )
    }
}

/// One pairing group as it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGroup {
    pub explanation: String,
    pub colors: Vec<ToneVariant>,
}

/// Persisted shape of a palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteDocument {
    pub dominant: RgbColor,
    pub suggestions: BTreeMap<Theory, StoredGroup>,
    #[serde(rename = "dominantHex")]
    pub dominant_hex: String,
}

impl From<&Palette> for PaletteDocument {
    fn from(palette: &Palette) -> Self {
        let suggestions = palette
            .suggestions
            .iter()
            .map(|(theory, group)| {
                let stored = StoredGroup {
                    explanation: group.explanation.clone(),
                    colors: group.colors.clone(),
                };
                (*theory, stored)
            })
            .collect();

        Self {
            dominant: palette.dominant,
            suggestions,
            dominant_hex: palette.dominant_hex(),
        }
    }
}

impl PaletteDocument {
    pub fn into_palette(self) -> Palette {
        let suggestions = self
            .suggestions
            .into_iter()
            .map(|(theory, stored)| {
                let group = PairingGroup {
                    theory,
                    explanation: stored.explanation,
                    colors: stored.colors,
                };
                (theory, group)
            })
            .collect();

        Palette {
            dominant: self.dominant,
            suggestions,
        }
    }
}

/// A saved palette with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredPalette {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub document: PaletteDocument,
}

impl StoredPalette {
    pub fn palette(&self) -> Palette {
        self.document.clone().into_palette()
    }
}

/// Everything in one collection, newest first.
pub type Snapshot = Vec<StoredPalette>;

/// Live view of one collection.
///
/// Yields the snapshot taken at subscription time first, then a fresh
/// snapshot after every save into the same scope.
pub struct Subscription {
    initial: Option<Snapshot>,
    receiver: broadcast::Receiver<Snapshot>,
}

impl Subscription {
    /// Next snapshot if one is ready, without waiting.
    pub fn try_next(&mut self) -> Option<Snapshot> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        loop {
            match self.receiver.try_recv() {
                Ok(snapshot) => return Some(snapshot),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!("subscriber lagged, skipped {} snapshots", skipped);
                }
                Err(_) => return None,
            }
        }
    }

    /// Wait for the next snapshot. `None` once the library is dropped.
    pub async fn next(&mut self) -> Option<Snapshot> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        loop {
            match self.receiver.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("subscriber lagged, skipped {} snapshots", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// SQLite-backed palette store.
///
/// Owns a single `Connection`, so a library is used from one thread at a
/// time; subscribers are tracked per collection path.
pub struct PaletteLibrary {
    conn: Connection,
    subscribers: RefCell<HashMap<String, broadcast::Sender<Snapshot>>>,
}

impl PaletteLibrary {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let library = Self {
            conn,
            subscribers: RefCell::new(HashMap::new()),
        };
        library.initialize_schema()?;
        Ok(library)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS palettes (
                id INTEGER PRIMARY KEY,
                collection TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                document TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS palettes_collection ON palettes (collection, created_at);",
        )?;
        info!("palette library ready");
        Ok(())
    }

    /// Save a palette; the library assigns its id and timestamp.
    pub fn put(&self, scope: &Scope, palette: &Palette) -> Result<StoredPalette> {
        let document = PaletteDocument::from(palette);
        let body = serde_json::to_string(&document)?;
        let timestamp = Utc::now();

        self.conn.execute(
            "INSERT INTO palettes (collection, created_at, document) VALUES (?1, ?2, ?3)",
            params![scope.collection_path(), timestamp.timestamp_millis(), body],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("saved palette {} to {}", id, scope.collection_path());

        // row is committed; fan-out failures are only logged
        if let Err(e) = self.notify(scope) {
            warn!("could not notify subscribers of {}: {}", scope.collection_path(), e);
        }

        Ok(StoredPalette {
            id,
            timestamp: from_millis(timestamp.timestamp_millis()),
            document,
        })
    }

    /// All palettes in `scope`, newest first.
    pub fn query(&self, scope: &Scope) -> Result<Vec<StoredPalette>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, document FROM palettes
             WHERE collection = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([scope.collection_path()], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
        })?;

        let mut palettes = Vec::new();
        for row in rows {
            let (id, created_at, body) = row?;
            palettes.push(decode(id, created_at, &body)?);
        }
        Ok(palettes)
    }

    pub fn get(&self, scope: &Scope, id: i64) -> Result<StoredPalette> {
        let row = self
            .conn
            .query_row(
                "SELECT created_at, document FROM palettes WHERE collection = ?1 AND id = ?2",
                params![scope.collection_path(), id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((created_at, body)) => decode(id, created_at, &body),
            None => Err(LibraryError::NotFound(id)),
        }
    }

    pub fn count(&self, scope: &Scope) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM palettes WHERE collection = ?1",
            [scope.collection_path()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Watch `scope` for saves.
    pub fn subscribe(&self, scope: &Scope) -> Result<Subscription> {
        let initial = self.query(scope)?;
        let receiver = self
            .subscribers
            .borrow_mut()
            .entry(scope.collection_path())
            .or_insert_with(|| broadcast::channel(SUBSCRIBER_CAPACITY).0)
            .subscribe();

        Ok(Subscription {
            initial: Some(initial),
            receiver,
        })
    }

    fn notify(&self, scope: &Scope) -> Result<()> {
        let path = scope.collection_path();
        let mut subscribers = self.subscribers.borrow_mut();

        let Some(sender) = subscribers.get(&path) else {
            return Ok(());
        };
        if sender.receiver_count() == 0 {
            subscribers.remove(&path);
            return Ok(());
        }

        let snapshot = self.query(scope)?;
        let delivered = sender.send(snapshot).unwrap_or(0);
        debug!("pushed snapshot of {} to {} subscribers", path, delivered);
        Ok(())
    }
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn decode(id: i64, created_at: i64, body: &str) -> Result<StoredPalette> {
    let document: PaletteDocument = serde_json::from_str(body)?;
    Ok(StoredPalette {
        id,
        timestamp: from_millis(created_at),
        document,
    })
}
