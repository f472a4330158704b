use serde_json::json;

use crate::{
    DuplicatePolicy, ErrorKind, Kind, Loader, Registry,
    config::Config,
    fixture::{self, Fixture},
    storage::local::LocalDatabase,
};

async fn open() -> LocalDatabase {
    LocalDatabase::open("sqlite::memory:").await.unwrap()
}

async fn count(db: &LocalDatabase, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}

async fn load_bundled(db: &LocalDatabase) {
    let fixtures = [fixture::bundled().unwrap()];
    Loader::new(db.client()).load(&fixtures).await.unwrap();
}

#[tokio::test]
async fn bundled_fixture_populates_all_tables() {
    let db = open().await;
    load_bundled(&db).await;
    assert_eq!(count(&db, "export_type").await, 11);
    assert_eq!(count(&db, "export_filter").await, 5);
    assert_eq!(count(&db, "export_status").await, 6);

    let registry = Registry::new(db.pool().clone());
    let bibs = registry.export_type("BibsToSolr").await.unwrap().unwrap();
    assert_eq!(bibs.order, 4);
    assert_eq!(bibs.record_model.as_deref(), Some("BibRecord"));
    assert_eq!(bibs.path, "export.basic_exporters.BibsToSolr");

    let locations = registry.export_type("LocationsToSolr").await.unwrap().unwrap();
    assert_eq!(locations.record_model, None);

    let in_progress = registry.status("in_progress").await.unwrap().unwrap();
    assert!(in_progress.description.contains("Celery worker"));
    assert!(registry.status("stalled").await.unwrap().is_none());
}

#[tokio::test]
async fn status_table_has_no_order_column() {
    let db = open().await;
    load_bundled(&db).await;
    let columns = sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info('export_status')")
        .fetch_all(db.pool())
        .await
        .unwrap();
    assert_eq!(columns, ["pk", "label", "description"]);
}

#[tokio::test]
async fn listings_follow_order() {
    let db = open().await;
    load_bundled(&db).await;
    let registry = Registry::new(db.pool().clone());
    let types = registry.export_types().await.unwrap();
    assert!(types.windows(2).all(|w| w[0].order <= w[1].order));
    assert_eq!(types[0].pk, "ItemsToSolr");
    let filters = registry
        .export_filters()
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.pk)
        .collect::<Vec<_>>();
    assert_eq!(
        filters,
        [
            "full_export",
            "last_export",
            "updated_date_range",
            "record_range",
            "location"
        ]
    );
}

#[tokio::test]
async fn loading_twice_is_idempotent() {
    let db = open().await;
    load_bundled(&db).await;
    let registry = Registry::new(db.pool().clone());
    let first = registry.dump().await.unwrap().to_value();
    load_bundled(&db).await;
    let second = registry.dump().await.unwrap().to_value();
    assert_eq!(first, second);
    assert_eq!(count(&db, "export_type").await, 11);
}

#[tokio::test]
async fn reload_overwrites_fields() {
    let db = open().await;
    load_bundled(&db).await;
    let update = Fixture::from_value(
        "update.json",
        json!([
            {
                "fields": {"label": "Succeeded", "description": "Finished cleanly."},
                "model": "export.status",
                "pk": "success"
            },
            {
                "fields": {"label": "Cancelled", "description": "Stopped by an administrator."},
                "model": "export.status",
                "pk": "cancelled"
            }
        ]),
    )
    .unwrap();
    Loader::new(db.client()).load(&[update]).await.unwrap();

    let registry = Registry::new(db.pool().clone());
    let success = registry.status("success").await.unwrap().unwrap();
    assert_eq!(success.label, "Succeeded");
    assert_eq!(success.description, "Finished cleanly.");
    assert!(registry.status("cancelled").await.unwrap().is_some());
    assert_eq!(count(&db, "export_status").await, 7);
    assert_eq!(count(&db, "export_type").await, 11);
}

#[tokio::test]
async fn failed_write_rolls_back_the_whole_load() {
    let db = open().await;
    sqlx::raw_sql(concat!(
        "CREATE TABLE export_status (\n",
        "  \"pk\" TEXT NOT NULL,\n",
        "  \"label\" TEXT NOT NULL CHECK (\"label\" <> 'Waiting'),\n",
        "  \"description\" TEXT NOT NULL,\n",
        "  PRIMARY KEY (\"pk\")\n",
        ");\n",
    ))
    .execute(db.pool())
    .await
    .unwrap();
    let fixtures = [fixture::bundled().unwrap()];
    let err = Loader::new(db.client()).load(&fixtures).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Database);
    assert_eq!(count(&db, "export_type").await, 0);
    assert_eq!(count(&db, "export_filter").await, 0);
    assert_eq!(count(&db, "export_status").await, 0);
}

#[tokio::test]
async fn rejected_duplicates_write_nothing() {
    let db = open().await;
    let fixtures = [fixture::bundled().unwrap(), fixture::bundled().unwrap()];
    let loader = Loader::new(db.client()).with_policy(DuplicatePolicy::Reject);
    loader.migrate().await.unwrap();
    let err = loader.load(&fixtures).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicatePrimaryKey);
    assert_eq!(count(&db, "export_type").await, 0);
}

#[tokio::test]
async fn unknown_kind_aborts_before_any_write() {
    let db = open().await;
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    let bad = dir.path().join("bad.json");
    tokio::fs::write(&good, include_str!("../../fixtures/export.json"))
        .await
        .unwrap();
    tokio::fs::write(
        &bad,
        json!([{"fields": {}, "model": "export.exportinstance", "pk": "1"}]).to_string(),
    )
    .await
    .unwrap();
    let config = Config {
        fixtures: vec![good, bad],
        ..Config::default()
    };
    let err = config.read_fixtures().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownKind);
    assert!(err.context.path.ends_with("bad.json"));
    assert_eq!(err.context.index, Some(0));

    Loader::new(db.client()).migrate().await.unwrap();
    assert_eq!(count(&db, "export_type").await, 0);
}

#[tokio::test]
async fn status_falls_back_to_unknown() {
    let db = open().await;
    load_bundled(&db).await;
    let registry = Registry::new(db.pool().clone());
    assert_eq!(
        registry.status_or_unknown("done_with_errors").await.unwrap().pk,
        "done_with_errors"
    );
    assert_eq!(
        registry.status_or_unknown("stalled").await.unwrap().pk,
        "unknown"
    );

    let empty = open().await;
    Loader::new(empty.client()).migrate().await.unwrap();
    let err = Registry::new(empty.pool().clone())
        .status_or_unknown("stalled")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn dump_loads_into_an_identical_database() {
    let source = open().await;
    load_bundled(&source).await;
    let dump = Registry::new(source.pool().clone()).dump().await.unwrap();
    assert_eq!(dump.count(Kind::ExportType), 11);

    let target = open().await;
    let reparsed = Fixture::from_value("dump.json", dump.to_value()).unwrap();
    Loader::new(target.client()).load(&[reparsed]).await.unwrap();
    assert_eq!(
        Registry::new(target.pool().clone())
            .dump()
            .await
            .unwrap()
            .to_value(),
        dump.to_value()
    );
}
