//! Tutorial questions over the music catalog, one SQL statement each.
use crate::compare::RowOrder;
use crate::core::db::{CanonicalRow, ConnectionManager};
use crate::core::{Result, SqlzooError};

/// A tutorial question and the statement that answers it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Question {
    pub name: &'static str,
    pub prompt: &'static str,
    pub sql: &'static str,
}

impl Question {
    /// Runs the answer through the harness, returning its rows unchanged.
    pub fn run(&self, manager: &mut ConnectionManager) -> Result<Vec<CanonicalRow>> {
        manager.execute(self.sql)
    }

    pub fn row_order(&self) -> RowOrder {
        RowOrder::for_query(self.sql)
    }
}

pub const QUESTIONS: &[Question] = &[
    Question {
        name: "alison_artist",
        prompt: "Select the name of the artist who recorded the song 'Alison'.",
        sql: "
SELECT
  artist
FROM
  albums
JOIN tracks ON tracks.album = albums.asin
WHERE
  tracks.song = 'Alison'",
    },
    Question {
        name: "exodus_artist",
        prompt: "Select the name of the artist who recorded the song 'Exodus'.",
        sql: "
SELECT
  artist
FROM
  albums
JOIN tracks ON tracks.album = albums.asin
WHERE
  tracks.song = 'Exodus'",
    },
    Question {
        name: "blur_songs",
        prompt: "Select the song for each track on the album 'Blur'.",
        sql: "
SELECT
  song
FROM
  tracks
JOIN albums ON tracks.album = albums.asin
WHERE
  albums.title = 'Blur'",
    },
    Question {
        name: "heart_tracks",
        prompt: "For each album show the title and the total number of tracks containing \
                 the word 'Heart'. Order first by the number of such tracks, then by album title.",
        sql: "
SELECT
  title, COUNT(*)
FROM
  albums
JOIN tracks ON tracks.album = albums.asin
WHERE
  tracks.song LIKE '%Heart%'
GROUP BY
  title
ORDER BY
  COUNT(*) DESC, title ASC",
    },
    Question {
        name: "title_tracks",
        prompt: "A title track has a song that is the same as its album's title. \
                 Select the names of all the title tracks.",
        sql: "
SELECT
  song
FROM
  tracks
JOIN albums ON tracks.album = albums.asin
WHERE
  albums.title = tracks.song",
    },
    Question {
        name: "eponymous_albums",
        prompt: "An eponymous album has a title that is the same as its recording artist's name. \
                 Select the titles of all the eponymous albums.",
        sql: "
SELECT
  a1.title
FROM
  albums AS a1
JOIN albums AS a2 ON a1.asin = a2.asin
WHERE
  a1.title = a2.artist",
    },
    Question {
        name: "song_title_counts",
        prompt: "Select the song names that appear on more than two albums, \
                 along with the number of albums they appear on.",
        sql: "
SELECT
  t1.song, COUNT(DISTINCT albums.asin)
FROM
  tracks AS t1
JOIN albums ON t1.album = albums.asin
GROUP BY
  t1.song
HAVING
  COUNT(DISTINCT albums.asin) > 2",
    },
    Question {
        name: "best_value",
        prompt: "A good value album is one where the price per track is less than 50 pence. \
                 Show the title, the price and the number of tracks of each good value album.",
        sql: "
SELECT
  title, price, COUNT(tracks.song)
FROM
  albums
JOIN tracks ON tracks.album = albums.asin
GROUP BY
  title, price
HAVING
  price/COUNT(tracks.song) < 0.5",
    },
    Question {
        name: "top_track_counts",
        prompt: "List the top 10 albums by track count with their track counts, \
                 ordered by track count and then title, both descending.",
        sql: "
SELECT
  title, COUNT(tracks.song)
FROM
  albums
JOIN tracks ON tracks.album = albums.asin
GROUP BY
  title
ORDER BY
  COUNT(tracks.song) DESC, title DESC
LIMIT
  10",
    },
    Question {
        name: "rock_superstars",
        prompt: "Select the artist who has recorded the most rock albums, \
                 as well as the number of albums.",
        sql: "
SELECT
  artist, COUNT(DISTINCT title)
FROM
  albums
JOIN styles ON styles.album = albums.asin
WHERE
  style LIKE '%Rock%'
GROUP BY
  artist
ORDER BY
  COUNT(DISTINCT title) DESC
LIMIT 1",
    },
    Question {
        name: "expensive_tastes",
        prompt: "Select the five styles of music with the highest average price per track, \
                 along with the price per track.",
        sql: "
SELECT
  styles.style, SUM(price)/SUM(num_tracks) AS avg_price
FROM
  styles
JOIN
(
  SELECT
    albums.asin, albums.price AS price, COUNT(tracks.song) AS num_tracks
  FROM
    tracks
  JOIN
    albums ON albums.asin = tracks.album
  WHERE
    price IS NOT NULL
  GROUP BY
    albums.asin
) AS track_counts ON styles.album = track_counts.asin
GROUP BY
  styles.style
ORDER BY
  avg_price DESC
LIMIT 5",
    },
];

pub fn all() -> &'static [Question] {
    QUESTIONS
}

pub fn find(name: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|question| question.name == name)
}

/// Like [`find`], but a missing name is an error.
pub fn get(name: &str) -> Result<&'static Question> {
    find(name).ok_or_else(|| SqlzooError::UnknownQuestion(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = all().iter().map(|q| q.name).collect();
        assert_eq!(names.len(), all().len());
        assert_eq!(all().len(), 11);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("alison_artist").map(|q| q.name), Some("alison_artist"));
        assert!(find("no_such_question").is_none());
    }

    #[test]
    fn test_get_unknown_question() {
        assert_eq!(get("blur_songs").unwrap().name, "blur_songs");
        match get("no_such_question") {
            Err(SqlzooError::UnknownQuestion(name)) => assert_eq!(name, "no_such_question"),
            other => panic!("Expected UnknownQuestion error, got {:?}", other),
        }
    }

    #[test]
    fn test_row_order_follows_order_by() {
        let ordered: Vec<&str> = all()
            .iter()
            .filter(|q| q.row_order() == RowOrder::Strict)
            .map(|q| q.name)
            .collect();
        assert_eq!(
            ordered,
            vec!["heart_tracks", "top_track_counts", "rock_superstars", "expensive_tastes"]
        );
    }
}
