/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Song headers (group/title identity)
CREATE TABLE IF NOT EXISTS songs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    group_name TEXT NOT NULL,
    song_name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_songs_group_song ON songs(group_name, song_name);

-- Song details (1:1 with songs, removed with their header)
CREATE TABLE IF NOT EXISTS song_details (
    song_id INTEGER PRIMARY KEY REFERENCES songs(id) ON DELETE CASCADE,
    release_date TEXT,
    text TEXT NOT NULL DEFAULT '',
    link TEXT NOT NULL DEFAULT '',
    artist TEXT NOT NULL DEFAULT '',
    album TEXT NOT NULL DEFAULT '',
    genre TEXT NOT NULL DEFAULT '',
    duration TEXT NOT NULL DEFAULT '',
    key TEXT NOT NULL DEFAULT '',
    tempo TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_song_details_release_date ON song_details(release_date);
"#;

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
