use std::collections::HashMap;

use gametrack_core::GameStatus;
use gametrack_db::*;
use plist::{Dictionary, Uid, Value};
use rusqlite::{Connection, params};

const ZGAME_SQL: &str = "
    CREATE TABLE ZGAME (
        Z_PK INTEGER PRIMARY KEY,
        ZID BLOB,
        ZGAMEID INTEGER,
        ZTITLE VARCHAR,
        ZSUMMARY VARCHAR,
        ZDEVELOPER VARCHAR,
        ZPUBLISHER VARCHAR,
        ZPOSTERURL VARCHAR,
        ZBANNERURL VARCHAR,
        ZRELEASEDATE TIMESTAMP,
        ZRELEASEYEAR INTEGER,
        ZPLATFORMS BLOB,
        ZOWNEDPLATFORM VARCHAR,
        ZADDITIONALPLATFORMS BLOB,
        ZGAMESTATE INTEGER,
        ZCOMPLETIONSTATE INTEGER,
        ZCOMPLETION INTEGER,
        ZPRIORITY INTEGER,
        ZFORMAT INTEGER,
        ZUSERRATING INTEGER,
        ZCRITICRATING INTEGER,
        ZHOURSPLAYED FLOAT,
        ZADDITIONALPLAYTIME FLOAT,
        ZSTARTDATE TIMESTAMP,
        ZFINISHDATE TIMESTAMP,
        ZADDEDDATE TIMESTAMP,
        ZNOTES VARCHAR,
        ZREVIEW VARCHAR,
        ZREVIEWSPOILERS INTEGER,
        ZTIMETOBEATSTORY FLOAT,
        ZTIMETOBEATEXTRAS FLOAT,
        ZTIMETOBEATCOMPLETE FLOAT,
        ZTIMETOBEATTYPE INTEGER,
        ZSTEAMDECKSTATUS INTEGER,
        ZGENRES BLOB
    );";

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(ZGAME_SQL).unwrap();
    conn
}

fn string_array(values: &[&str]) -> Vec<u8> {
    let mut root = Dictionary::new();
    root.insert(
        "NS.objects".to_string(),
        Value::Array(
            (0..values.len())
                .map(|i| Value::Uid(Uid::new(2 + i as u64)))
                .collect(),
        ),
    );
    let mut objects = vec![Value::String("$null".to_string()), Value::Dictionary(root)];
    objects.extend(values.iter().map(|v| Value::String(v.to_string())));

    let mut top = Dictionary::new();
    top.insert("root".to_string(), Value::Uid(Uid::new(1)));
    let mut archive = Dictionary::new();
    archive.insert("$top".to_string(), Value::Dictionary(top));
    archive.insert("$objects".to_string(), Value::Array(objects));

    let mut buf = Vec::new();
    Value::Dictionary(archive).to_writer_binary(&mut buf).unwrap();
    buf
}

fn insert_minimal(conn: &Connection, game_id: i64, title: &str, state: i64) {
    conn.execute(
        "INSERT INTO ZGAME (ZGAMEID, ZTITLE, ZGAMESTATE) VALUES (?1, ?2, ?3)",
        params![game_id, title, state],
    )
    .unwrap();
}

#[test]
fn game_ids_are_ascending() {
    let conn = setup_db();
    insert_minimal(&conn, 30, "Hades", 4);
    insert_minimal(&conn, 10, "Celeste", 1);
    insert_minimal(&conn, 20, "Outer Wilds", 2);

    assert_eq!(game_ids(&conn).unwrap(), vec![10, 20, 30]);
}

#[test]
fn extracts_full_row() {
    let conn = setup_db();
    let uuid = [0xAB_u8; 16];
    conn.execute(
        "INSERT INTO ZGAME (
            ZID, ZGAMEID, ZTITLE, ZSUMMARY, ZDEVELOPER, ZPUBLISHER,
            ZRELEASEDATE, ZPLATFORMS, ZOWNEDPLATFORM, ZGAMESTATE,
            ZUSERRATING, ZHOURSPLAYED, ZADDEDDATE, ZREVIEWSPOILERS,
            ZTIMETOBEATSTORY, ZGENRES
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            uuid.to_vec(),
            1942,
            "The Witcher 3: Wild Hunt",
            "Geralt hunts monsters.",
            "CD Projekt RED",
            "CD Projekt",
            453_513_600.0_f64,
            string_array(&["PC", "PlayStation 4", "Xbox One"]),
            "PC",
            4,
            9,
            120.5_f64,
            600_000_000.25_f64,
            1,
            51.5_f64,
            string_array(&["Role-playing (RPG)", "Adventure"]),
        ],
    )
    .unwrap();

    let qids = HashMap::from([(1942, "Q11835640".to_string())]);
    let games = extract_games(&conn, &qids).unwrap();
    assert_eq!(games.len(), 1);

    let game = &games[0];
    assert_eq!(game.uuid, "ABABABAB-ABAB-ABAB-ABAB-ABABABABABAB");
    assert_eq!(game.igdb_id, 1942);
    assert_eq!(game.wikidata_qid, "Q11835640");
    assert_eq!(game.title, "The Witcher 3: Wild Hunt");
    assert_eq!(game.developer, "CD Projekt RED");
    assert_eq!(game.release_year, 2015);
    assert_eq!(game.platforms, vec!["PC", "PlayStation 4", "Xbox One"]);
    assert_eq!(game.owned_platform, "PC");
    assert!(game.additional_platforms.is_empty());
    assert_eq!(game.status, GameStatus::Completed);
    assert_eq!(game.user_rating, 9);
    assert_eq!(game.hours_played, 120.5);
    assert!(game.review_spoilers);
    assert_eq!(game.time_to_beat_story, 51.5);
    assert_eq!(game.genres, vec!["Role-playing (RPG)", "Adventure"]);
    assert_eq!(
        game.added_date.map(|d| gametrack_core::format_iso_millis(&d)),
        Some("2020-01-06T10:40:00.250Z".to_string())
    );
    assert_eq!(game.start_date, None);
}

#[test]
fn integer_stored_measures_read_as_floats() {
    let conn = setup_db();
    conn.execute(
        "INSERT INTO ZGAME (ZGAMEID, ZTITLE, ZGAMESTATE, ZHOURSPLAYED) VALUES (1, 'Tetris', 3, 12)",
        [],
    )
    .unwrap();
    let games = extract_games(&conn, &HashMap::new()).unwrap();
    assert_eq!(games[0].hours_played, 12.0);
}

#[test]
fn unmapped_status_aborts_whole_extraction() {
    let conn = setup_db();
    insert_minimal(&conn, 10, "Celeste", 1);
    insert_minimal(&conn, 20, "Outer Wilds", 42);
    insert_minimal(&conn, 30, "Hades", 4);

    let err = extract_games(&conn, &HashMap::new()).unwrap_err();
    assert!(
        matches!(err, ExtractError::UnmappedStatus { igdb_id: 20, .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn null_title_is_malformed() {
    let conn = setup_db();
    conn.execute(
        "INSERT INTO ZGAME (ZGAMEID, ZTITLE, ZGAMESTATE) VALUES (5, NULL, 1)",
        [],
    )
    .unwrap();
    let err = extract_games(&conn, &HashMap::new()).unwrap_err();
    assert!(matches!(err, ExtractError::MalformedRow { igdb_id: 5, .. }));
}

#[test]
fn text_game_id_is_a_column_type_error() {
    let conn = setup_db();
    conn.execute(
        "INSERT INTO ZGAME (ZGAMEID, ZTITLE, ZGAMESTATE) VALUES ('abc', 'Odd', 1)",
        [],
    )
    .unwrap();
    let err = extract_games(&conn, &HashMap::new()).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::Store(StoreError::ColumnType { .. })
    ));
}

#[test]
fn store_is_opened_read_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("GameData.sqlite");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(ZGAME_SQL).unwrap();
        insert_minimal(&conn, 10, "Celeste", 1);
    }

    let conn = open_read_only(&path).unwrap();
    assert_eq!(game_ids(&conn).unwrap(), vec![10]);
    assert!(
        conn.execute("DELETE FROM ZGAME", []).is_err(),
        "read-only connection accepted a write"
    );
}

#[test]
fn missing_store_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_read_only(&dir.path().join("nope.sqlite")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}
