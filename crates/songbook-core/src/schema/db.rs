use rusqlite::functions::FunctionFlags;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{NewSong, PageRequest, Pagination, Song, SongDetail, SongFilter, SongId, SongPage};

use super::migrations::MIGRATIONS;
use super::query::{
    format_date, QueryFilter, CASEFOLD_FN, DATE_FORMAT, SONG_COLUMNS, SONG_FROM,
};

/// A database connection with CRUD methods for songs.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn init(conn: Connection) -> Result<Self> {
        // Per-connection setting; detail rows rely on ON DELETE CASCADE.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_casefold(&conn)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Song reads
impl Database {
    /// Find the first song with exactly this group and title.
    pub fn find_song_id(&self, group: &str, title: &str) -> Result<Option<SongId>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM songs WHERE group_name = ?1 AND song_name = ?2 ORDER BY id LIMIT 1",
                params![group, title],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// List songs matching `filter`, one page at a time, ordered by id.
    pub fn list_songs(&self, filter: &SongFilter, page: PageRequest) -> Result<SongPage> {
        let query = QueryFilter::from_song_filter(filter);

        let total: i64 = self.conn.query_row(
            &query.count_sql(),
            params_from_iter(query.params()),
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&query.page_sql())?;
        let songs = stmt
            .query_map(params_from_iter(query.page_params(page)), row_to_song)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(SongPage {
            songs,
            pagination: Pagination::new(page, u64::try_from(total).unwrap_or(0)),
        })
    }

    /// Get a single song with its details.
    pub fn get_song(&self, id: SongId) -> Result<Song> {
        self.conn
            .query_row(
                &format!("SELECT {SONG_COLUMNS} {SONG_FROM} WHERE s.id = ?1"),
                [id],
                row_to_song,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "song",
                id: id.to_string(),
            })
    }

    /// Get the stored lyrics of a song.
    ///
    /// A song without a detail row has no text and reports `NotFound`.
    pub fn song_text(&self, id: SongId) -> Result<String> {
        self.conn
            .query_row(
                "SELECT text FROM song_details WHERE song_id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "song text",
                id: id.to_string(),
            })
    }
}

// Song writes
impl Database {
    /// Insert a song header and its detail row in one transaction.
    pub fn insert_song(&mut self, song: &NewSong, details: &SongDetail) -> Result<SongId> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO songs (group_name, song_name) VALUES (?1, ?2)",
            params![song.group, song.title],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO song_details (
                song_id, release_date, text, link, artist, album,
                genre, duration, key, tempo
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                details.release_date.map(format_date),
                details.text,
                details.link,
                details.artist,
                details.album,
                details.genre,
                details.duration,
                details.key,
                details.tempo,
            ],
        )?;

        tx.commit()?;
        Ok(id)
    }

    /// Update the mutable fields of a song: group, title, album and text.
    ///
    /// Updating an id that does not exist changes nothing and is not an
    /// error.
    pub fn update_song(&mut self, song: &Song) -> Result<()> {
        let tx = self.conn.transaction()?;

        let headers = tx.execute(
            "UPDATE songs SET group_name = ?1, song_name = ?2 WHERE id = ?3",
            params![song.group, song.title, song.id],
        )?;
        let details = tx.execute(
            "UPDATE song_details SET album = ?1, text = ?2 WHERE song_id = ?3",
            params![song.details.album, song.details.text, song.id],
        )?;

        tx.commit()?;
        log::debug!(
            "Updated song {}: {} header row(s), {} detail row(s)",
            song.id,
            headers,
            details
        );
        Ok(())
    }

    /// Delete a song; its detail row goes with it.
    ///
    /// Returns whether a row was removed.
    pub fn delete_song(&self, id: SongId) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM songs WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}

/// SQLite's LIKE only folds ASCII; filters compare through this instead.
fn register_casefold(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };

    let release_date = row
        .get::<_, Option<String>>(6)?
        .and_then(|s| chrono::NaiveDate::parse_from_str(&s, DATE_FORMAT).ok());

    Ok(Song {
        id: row.get(0)?,
        group: row.get(1)?,
        title: row.get(2)?,
        details: SongDetail {
            link: text(3)?,
            artist: text(4)?,
            album: text(5)?,
            release_date,
            text: text(7)?,
            genre: text(8)?,
            duration: text(9)?,
            key: text(10)?,
            tempo: text(11)?,
        },
    })
}
