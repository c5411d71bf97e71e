//! Seed loader: bootstraps the default user and the club catalog from
//! a JSON file.
//!
//! Loading is idempotent per club code, so re-running against a
//! populated database only adds what is missing.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use crate::db::{NewClub, NewUser, Store};
use crate::normalize::{normalize_code, normalize_name, normalize_tags};

/// One club entry in the seed file. Entries without a usable code are
/// skipped, matching the loader's lenient handling of the catalog.
#[derive(Debug, Deserialize)]
pub struct SeedClub {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Runs the full seed only when the club table is empty, so a fresh
/// `serve` starts with a usable catalog without clobbering anything.
pub async fn run_if_empty(store: &Store, seed_path: &str) -> Result<()> {
    if !store.list_clubs().await?.is_empty() {
        return Ok(());
    }
    run(store, seed_path).await
}

/// Creates the default (non-admin) user and loads the seed catalog.
pub async fn run(store: &Store, seed_path: &str) -> Result<()> {
    create_default_user(store).await?;
    load_clubs(store, seed_path).await
}

async fn create_default_user(store: &Store) -> Result<()> {
    if store.find_user_by_username("josh").await?.is_some() {
        info!("User 'josh' already exists");
        return Ok(());
    }

    let inserted = store
        .insert_user(NewUser {
            username: "josh".to_string(),
            display_name: Some("Josh".to_string()),
            email: Some("josh@seas.upenn.edu".to_string()),
            admin: false,
        })
        .await?;

    if inserted.is_some() {
        info!("Created user 'josh'");
    }
    Ok(())
}

async fn load_clubs(store: &Store, seed_path: &str) -> Result<()> {
    let path = Path::new(seed_path);
    if !path.exists() {
        warn!("Seed file not found at {}, skipping club load", seed_path);
        return Ok(());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file: {seed_path}"))?;

    let seed_clubs: Vec<SeedClub> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse seed file: {seed_path}"))?;

    let mut added = 0usize;
    for entry in seed_clubs {
        let Some(code) = normalize_code(&entry.code) else {
            continue;
        };

        if store.find_club_by_code(&code).await?.is_some() {
            info!("Skipping existing club: {}", code);
            continue;
        }

        let name = normalize_name(&entry.name).unwrap_or_default();

        let inserted = store
            .insert_club(NewClub {
                code,
                name,
                description: entry.description,
                tags: normalize_tags(&entry.tags),
            })
            .await?;

        if inserted.is_some() {
            added += 1;
        }
    }

    info!("Loaded {} new clubs from {}", added, seed_path);
    Ok(())
}
