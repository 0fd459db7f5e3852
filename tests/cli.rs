//! CLI Integration Tests
//!
//! Date validation must abort before the cache is created or touched.

use apod::cli::Cli;
use chrono::Duration;
use clap::Parser;
use tempfile::TempDir;

fn cli(home: &std::path::Path, args: &[&str]) -> Cli {
    let mut argv = vec!["apod", "--home", home.to_str().unwrap()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn test_date_before_archive_aborts_without_cache() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("apod");

    let result = cli(&home, &["fetch", "1995-06-15", "--no-wallpaper"])
        .execute()
        .await;

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("1995-06-16"));
    assert!(!home.exists());
}

#[tokio::test]
async fn test_future_date_aborts_without_cache() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("apod");
    let tomorrow = (apod::domain::date::today() + Duration::days(1)).to_string();

    let result = cli(&home, &["view", &tomorrow]).execute().await;

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("future"));
    assert!(!home.exists());
}

#[tokio::test]
async fn test_malformed_date_aborts_without_cache() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("apod");

    let result = cli(&home, &["fetch", "yesterday"]).execute().await;

    assert!(result.is_err());
    assert!(!home.exists());
}

#[tokio::test]
async fn test_list_bootstraps_empty_cache() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("apod");

    cli(&home, &["list"]).execute().await.unwrap();
    cli(&home, &["list"]).execute().await.unwrap();

    assert!(home.join("images").is_dir());
    assert!(home.join("image_cache.db").is_file());
}

#[tokio::test]
async fn test_show_unknown_record_fails() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("apod");

    let result = cli(&home, &["show", "0123456789abcdef0123456789abcdef"])
        .execute()
        .await;

    assert!(result.is_err());
}
