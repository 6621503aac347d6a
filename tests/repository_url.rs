//! PostgreSQL repository tests. Run with `cargo test -- --ignored` and a
//! reachable `DATABASE_URL`.

use sqlx::PgPool;
use std::sync::Arc;
use url_keeper::domain::entities::NewUrlRecord;
use url_keeper::domain::repositories::UrlRepository;
use url_keeper::infrastructure::persistence::PgUrlRepository;

fn new_record(key: &str) -> NewUrlRecord {
    NewUrlRecord {
        key: key.to_string(),
        secret_key: format!("{key}_SECRET01"),
        target_url: "https://example.com".to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    let created = repo.create(new_record("ABCDE")).await.unwrap();
    assert_eq!(created.key, "ABCDE");
    assert_eq!(created.secret_key, "ABCDE_SECRET01");
    assert_eq!(created.clicks, 0);
    assert!(created.is_active());
    assert!(created.deactivated_at.is_none());

    let by_key = repo.find_by_key("ABCDE").await.unwrap().unwrap();
    assert_eq!(by_key.id, created.id);

    let by_secret = repo
        .find_by_secret_key("ABCDE_SECRET01")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_secret.id, created.id);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_key_is_conflict(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.create(new_record("DUPE1")).await.unwrap();
    let err = repo
        .create(NewUrlRecord {
            secret_key: "DUPE1_OTHER001".to_string(),
            ..new_record("DUPE1")
        })
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.to_error_info().details["constraint"], "urls_key_key");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_secret_is_conflict(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.create(new_record("SEC01")).await.unwrap();
    let err = repo
        .create(NewUrlRecord {
            key: "SEC02".to_string(),
            ..new_record("SEC01")
        })
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(
        err.to_error_info().details["constraint"],
        "urls_secret_key_key"
    );
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_increment_clicks(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    let record = repo.create(new_record("CLICK")).await.unwrap();

    let once = repo.increment_clicks(&record).await.unwrap();
    let twice = repo.increment_clicks(&record).await.unwrap();

    assert_eq!(once.clicks, 1);
    assert_eq!(twice.clicks, 2);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_increments(pool: PgPool) {
    let repo = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    let record = repo.create(new_record("MANY1")).await.unwrap();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let repo = repo.clone();
            let record = record.clone();
            tokio::spawn(async move { repo.increment_clicks(&record).await.unwrap() })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let stored = repo.find_by_key("MANY1").await.unwrap().unwrap();
    assert_eq!(stored.clicks, 20);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_deactivate_hides_but_keeps_row(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool.clone()));
    let record = repo.create(new_record("GONE1")).await.unwrap();
    repo.increment_clicks(&record).await.unwrap();

    let deactivated = repo.deactivate(&record).await.unwrap();
    assert!(!deactivated.is_active());
    assert_eq!(deactivated.clicks, 1);
    let first_stamp = deactivated.deactivated_at.unwrap();

    assert!(repo.find_by_key("GONE1").await.unwrap().is_none());
    assert!(
        repo.find_by_secret_key("GONE1_SECRET01")
            .await
            .unwrap()
            .is_none()
    );
    assert!(repo.key_exists("GONE1").await.unwrap());
    assert!(repo.increment_clicks(&record).await.unwrap_err().is_not_found());

    let again = repo.deactivate(&record).await.unwrap();
    assert_eq!(again.deactivated_at, Some(first_stamp));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_stats(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    let empty = repo.stats().await.unwrap();
    assert_eq!((empty.total, empty.active, empty.clicks), (0, 0, 0));

    let a = repo.create(new_record("STAT1")).await.unwrap();
    let b = repo.create(new_record("STAT2")).await.unwrap();
    repo.increment_clicks(&a).await.unwrap();
    repo.increment_clicks(&b).await.unwrap();
    repo.increment_clicks(&b).await.unwrap();
    repo.deactivate(&b).await.unwrap();

    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.active, 1);
    assert_eq!(stats.inactive(), 1);
    assert_eq!(stats.clicks, 3);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_ping(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
