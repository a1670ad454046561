//! End-to-end behavior of the query harness: connection lifecycle,
//! normalization and error propagation.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sqlzoo::compare::{compare_rows, RowOrder};
    use sqlzoo::fixtures::{self, AlbumRecord};
    use sqlzoo::{canonical_row, ConnectionManager, ConnectionTarget, Scalar, SqlzooError};
    use tempfile::NamedTempFile;

    const LEISURE_SONGS: &str = "SELECT song FROM tracks JOIN albums ON tracks.album = albums.asin \
                                 WHERE albums.title = 'Leisure'";

    fn leisure_only() -> ConnectionManager {
        let mut manager = ConnectionManager::new(ConnectionTarget::Memory);
        let conn = manager.acquire().unwrap();
        fixtures::create_schema(conn).unwrap();
        fixtures::insert_album(
            conn,
            &AlbumRecord {
                asin: "B001",
                title: "Leisure",
                artist: "Blur",
                price: Some(9.99),
                rdate: "1991-08-26",
                label: "Food",
                rank: 120,
            },
        )
        .unwrap();
        fixtures::insert_track(conn, "B001", 1, 1, "She's So High").unwrap();
        manager
    }

    #[test]
    fn test_single_track_join() {
        let mut manager = leisure_only();
        let rows = manager.execute(LEISURE_SONGS).unwrap();
        assert_eq!(rows, vec![canonical_row! { "song" => "She's So High" }]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let mut manager = fixtures::sample_catalog().unwrap();
        let rows = manager
            .execute("SELECT song FROM tracks JOIN albums ON tracks.album = albums.asin WHERE albums.title = 'Parklife'")
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_malformed_statement_is_query_error() {
        let mut manager = fixtures::sample_catalog().unwrap();
        match manager.execute("SELEC 1") {
            Err(SqlzooError::Query(msg)) => assert!(msg.contains("syntax error"), "{}", msg),
            other => panic!("Expected Query error, got {:?}", other),
        }
        // The connection stays usable after a failed statement.
        assert_eq!(manager.execute("SELECT 1 AS one").unwrap().len(), 1);
    }

    #[test]
    fn test_trailing_statement_is_query_error_and_nothing_runs() {
        let mut manager = fixtures::sample_catalog().unwrap();
        for sql in [
            "INSERT INTO styles (album, style) VALUES ('B003', 'Pub Rock'); this is garbage",
            "INSERT INTO styles (album, style) VALUES ('B003', 'Pub Rock'); DELETE FROM styles",
            "CREATE TABLE scratch (x INTEGER); INSERT INTO scratch VALUES (1)",
        ] {
            assert!(
                matches!(manager.execute(sql), Err(SqlzooError::Query(_))),
                "{}",
                sql
            );
        }

        let styles = manager.execute("SELECT style FROM styles WHERE album = 'B003'").unwrap();
        assert_eq!(styles, vec![canonical_row! { "style" => "New Wave" }]);
        let scratch = manager
            .execute("SELECT name FROM sqlite_master WHERE name = 'scratch'")
            .unwrap();
        assert!(scratch.is_empty());
    }

    #[test]
    fn test_blank_statement_is_query_error() {
        let mut manager = fixtures::sample_catalog().unwrap();
        for sql in ["", "  \n", "/* nothing */ -- still nothing"] {
            match manager.execute(sql) {
                Err(SqlzooError::Query(msg)) => assert_eq!(msg, "empty statement"),
                other => panic!("Expected Query error for {:?}, got {:?}", sql, other),
            }
        }
    }

    #[test]
    fn test_constraint_violation_is_query_error() {
        let mut manager = fixtures::sample_catalog().unwrap();
        let result = manager.execute("INSERT INTO albums (asin, title) VALUES ('B001', 'Leisure Again')");
        match result {
            Err(SqlzooError::Query(msg)) => assert!(msg.contains("UNIQUE constraint failed"), "{}", msg),
            other => panic!("Expected Query error, got {:?}", other),
        }
    }

    #[test]
    fn test_unreachable_store_is_connection_error() {
        let result = ConnectionManager::scoped(
            ConnectionTarget::parse("/nonexistent/dir/catalog.db"),
            |manager| manager.execute("SELECT 1"),
        );
        assert!(matches!(result, Err(SqlzooError::Connection { .. })));
    }

    #[test]
    fn test_null_price_is_canonical_null() {
        let mut manager = fixtures::sample_catalog().unwrap();
        let rows = manager
            .execute("SELECT title, price FROM albums WHERE asin = 'B006'")
            .unwrap();
        assert_eq!(rows[0].get("price"), Some(&Scalar::Null));
        assert_ne!(rows[0].get("price"), Some(&Scalar::from("")));
        assert_ne!(rows[0].get("price"), Some(&Scalar::Integer(0)));
    }

    #[test]
    fn test_scalar_types_by_column() {
        let mut manager = fixtures::sample_catalog().unwrap();
        let rows = manager
            .execute("SELECT asin, price, rdate, rank FROM albums WHERE asin = 'B004'")
            .unwrap();
        assert_eq!(
            rows,
            vec![canonical_row! {
                "asin" => "B004",
                "price" => 1.5,
                "rdate" => NaiveDate::from_ymd_opt(1977, 6, 3).unwrap(),
                "rank" => 15,
            }]
        );
    }

    #[test]
    fn test_row_shape_matches_select_list() {
        let mut manager = fixtures::sample_catalog().unwrap();
        let rows = manager
            .execute("SELECT title, artist, title, price * 2 AS doubled FROM albums")
            .unwrap();
        assert_eq!(rows.len(), fixtures::SAMPLE_ALBUMS.len());
        for row in &rows {
            let columns: Vec<&str> = row.columns().collect();
            assert_eq!(columns, vec!["title", "artist", "title", "doubled"]);
        }
    }

    #[test]
    fn test_order_by_is_non_decreasing_and_stable() {
        let mut manager = fixtures::sample_catalog().unwrap();
        let sql = "SELECT asin, rank FROM albums ORDER BY rank ASC";
        let first = manager.execute(sql).unwrap();
        let ranks: Vec<i64> = first
            .iter()
            .map(|row| row.get("rank").and_then(Scalar::as_i64).unwrap())
            .collect();
        assert!(ranks.windows(2).all(|pair| pair[0] <= pair[1]));

        let second = manager.execute(sql).unwrap();
        assert_eq!(first, second);
        assert_eq!(RowOrder::for_query(sql), RowOrder::Strict);
    }

    #[test]
    fn test_read_only_queries_are_idempotent() {
        let mut manager = fixtures::sample_catalog().unwrap();
        let sql = "SELECT album, style FROM styles";
        let first = manager.execute(sql).unwrap();
        let second = manager.execute(sql).unwrap();
        assert!(compare_rows(&first, &second, RowOrder::Unordered).is_match());
    }

    #[test]
    fn test_writes_commit_immediately() {
        let file = NamedTempFile::new().unwrap();
        let target = ConnectionTarget::file(file.path());

        ConnectionManager::scoped(target.clone(), |manager| {
            fixtures::load_sample_catalog(manager.acquire()?)?;
            let rows = manager.execute(
                "INSERT INTO styles (album, style) VALUES ('B004', 'Roots Reggae')",
            )?;
            assert!(rows.is_empty());
            Ok(())
        })
        .unwrap();

        // A separate connection only sees the row if it was committed.
        let mut reader = ConnectionManager::new(target);
        let rows = reader
            .execute("SELECT style FROM styles WHERE album = 'B004' ORDER BY style")
            .unwrap();
        assert_eq!(
            rows,
            vec![
                canonical_row! { "style" => "Reggae" },
                canonical_row! { "style" => "Roots Reggae" },
            ]
        );
    }

    #[test]
    fn test_release_then_reacquire_reopens() {
        let file = NamedTempFile::new().unwrap();
        let mut manager = ConnectionManager::new(ConnectionTarget::file(file.path()));
        fixtures::load_sample_catalog(manager.acquire().unwrap()).unwrap();

        manager.release().unwrap();
        assert!(!manager.is_connected());
        manager.release().unwrap();

        let rows = manager.execute("SELECT COUNT(*) AS n FROM albums").unwrap();
        assert!(manager.is_connected());
        assert_eq!(rows, vec![canonical_row! { "n" => 7 }]);
    }
}
