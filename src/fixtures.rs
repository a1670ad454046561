//! Schema and sample data for the music catalog.
//!
//! The harness never creates tables itself; tests and the demo binary use this
//! loader to get a populated store first.
use crate::core::db::{ConnectionManager, ConnectionTarget};
use crate::core::Result;
use rusqlite::{params, Connection};
use tracing::debug;

const SCHEMA_SQL: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE albums (
    asin   TEXT NOT NULL PRIMARY KEY,
    title  TEXT,
    artist TEXT,
    price  FLOAT,
    rdate  DATE,
    label  TEXT,
    rank   INTEGER
);

CREATE TABLE styles (
    album TEXT NOT NULL REFERENCES albums (asin),
    style TEXT NOT NULL,
    PRIMARY KEY (album, style)
);

CREATE TABLE tracks (
    album TEXT NOT NULL REFERENCES albums (asin),
    disk  INTEGER NOT NULL,
    posn  INTEGER NOT NULL,
    song  TEXT,
    PRIMARY KEY (album, disk, posn)
);
"#;

/// One `albums` row.
#[derive(Debug, Clone, Copy)]
pub struct AlbumRecord {
    pub asin: &'static str,
    pub title: &'static str,
    pub artist: &'static str,
    pub price: Option<f64>,
    pub rdate: &'static str,
    pub label: &'static str,
    pub rank: i64,
}

pub const SAMPLE_ALBUMS: &[AlbumRecord] = &[
    AlbumRecord { asin: "B001", title: "Leisure", artist: "Blur", price: Some(9.99), rdate: "1991-08-26", label: "Food", rank: 120 },
    AlbumRecord { asin: "B002", title: "Blur", artist: "Blur", price: Some(8.49), rdate: "1997-02-10", label: "Food", rank: 45 },
    AlbumRecord { asin: "B003", title: "My Aim Is True", artist: "Elvis Costello", price: Some(6.99), rdate: "1977-07-22", label: "Stiff", rank: 300 },
    AlbumRecord { asin: "B004", title: "Exodus", artist: "Bob Marley", price: Some(1.50), rdate: "1977-06-03", label: "Island", rank: 15 },
    AlbumRecord { asin: "B005", title: "Hunky Dory", artist: "David Bowie", price: Some(1.20), rdate: "1971-12-17", label: "RCA", rank: 80 },
    AlbumRecord { asin: "B006", title: "Changesbowie", artist: "David Bowie", price: None, rdate: "1990-03-20", label: "Rykodisc", rank: 210 },
    AlbumRecord { asin: "B007", title: "Heart Songs", artist: "Various Artists", price: Some(12.00), rdate: "2001-05-01", label: "Sony", rank: 500 },
];

/// `(album, style)`
pub const SAMPLE_STYLES: &[(&str, &str)] = &[
    ("B001", "Alternative Rock"),
    ("B001", "Britpop"),
    ("B002", "Britpop"),
    ("B003", "New Wave"),
    ("B004", "Reggae"),
    ("B005", "Glam Rock"),
    ("B006", "Glam Rock"),
    ("B007", "Soft Rock"),
];

/// `(album, disk, posn, song)`
pub const SAMPLE_TRACKS: &[(&str, i64, i64, &str)] = &[
    ("B001", 1, 1, "She's So High"),
    ("B001", 1, 2, "Bang"),
    ("B001", 1, 3, "Sing"),
    ("B002", 1, 1, "Beetlebum"),
    ("B002", 1, 2, "Song 2"),
    ("B002", 1, 3, "Country Sad Ballad Man"),
    ("B003", 1, 1, "Welcome to the Working Week"),
    ("B003", 1, 2, "Alison"),
    ("B003", 1, 3, "Watching the Detectives"),
    ("B003", 1, 4, "Sweetheart Like You"),
    ("B004", 1, 1, "Natural Mystic"),
    ("B004", 1, 2, "Exodus"),
    ("B004", 1, 3, "Jamming"),
    ("B004", 1, 4, "Heartbreaker"),
    ("B005", 1, 1, "Changes"),
    ("B005", 1, 2, "Oh! You Pretty Things"),
    ("B005", 1, 3, "Life on Mars?"),
    ("B006", 1, 1, "Changes"),
    ("B006", 1, 2, "Heroes"),
    ("B006", 1, 3, "Space Oddity"),
    ("B007", 1, 1, "Changes"),
    ("B007", 1, 2, "Heart of Glass"),
    ("B007", 1, 3, "Total Eclipse of the Heart"),
    ("B007", 2, 1, "Heartbeat"),
];

/// Creates the `albums`, `styles` and `tracks` tables.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

pub fn insert_album(conn: &Connection, album: &AlbumRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO albums (asin, title, artist, price, rdate, label, rank)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![album.asin, album.title, album.artist, album.price, album.rdate, album.label, album.rank],
    )?;
    Ok(())
}

pub fn insert_style(conn: &Connection, album: &str, style: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO styles (album, style) VALUES (?1, ?2)",
        params![album, style],
    )?;
    Ok(())
}

pub fn insert_track(conn: &Connection, album: &str, disk: i64, posn: i64, song: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO tracks (album, disk, posn, song) VALUES (?1, ?2, ?3, ?4)",
        params![album, disk, posn, song],
    )?;
    Ok(())
}

/// Creates the schema and seeds the sample catalog in one transaction.
pub fn load_sample_catalog(conn: &Connection) -> Result<()> {
    create_schema(conn)?;

    conn.execute_batch("BEGIN")?;
    let seeded = seed(conn);
    match seeded {
        Ok(()) => conn.execute_batch("COMMIT")?,
        Err(_) => conn.execute_batch("ROLLBACK")?,
    }
    seeded?;

    debug!(
        "Loaded sample catalog: {} albums, {} styles, {} tracks",
        SAMPLE_ALBUMS.len(),
        SAMPLE_STYLES.len(),
        SAMPLE_TRACKS.len()
    );
    Ok(())
}

fn seed(conn: &Connection) -> Result<()> {
    for album in SAMPLE_ALBUMS {
        insert_album(conn, album)?;
    }
    for (album, style) in SAMPLE_STYLES {
        insert_style(conn, album, style)?;
    }
    for (album, disk, posn, song) in SAMPLE_TRACKS {
        insert_track(conn, album, *disk, *posn, song)?;
    }
    Ok(())
}

/// An in-memory manager with the sample catalog already loaded.
pub fn sample_catalog() -> Result<ConnectionManager> {
    let mut manager = ConnectionManager::new(ConnectionTarget::Memory);
    load_sample_catalog(manager.acquire()?)?;
    Ok(manager)
}
