//! # Integration tests for the remote backend
//!
//! These tests require a live Supabase project. They are skipped (not failed)
//! when credentials are missing, so a plain `cargo test` stays offline.
//!
//! ## Required environment variables
//!
//! ```bash
//! TALLY_BACKEND__URL=https://<project>.supabase.co
//! TALLY_BACKEND__ANON_KEY=eyJ...
//! ```
//!
//! Optional: `TALLY_AUTH__TEST_EMAIL` / `TALLY_AUTH__TEST_PASSWORD` for the
//! sign-in round trip. Auth state stays inside the backend value under test;
//! nothing is written to the keyring or the credentials file.
//!
//! ## Run
//!
//! ```bash
//! cargo test -p tally-backend --test live_remote -- --nocapture
//! ```

use tally_backend::Backend;
use tally_backend::remote::RemoteBackend;
use tally_backend::{BackendMode, filters::TemplateFilter};
use tally_config::BackendConfig;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_env() {
    let workspace_env = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.join(".env"));

    if let Some(env_path) = workspace_env {
        let _ = dotenvy::from_path(&env_path);
    }
}

fn backend_config() -> Option<BackendConfig> {
    load_env();
    let url = std::env::var("TALLY_BACKEND__URL").ok()?;
    let anon_key = std::env::var("TALLY_BACKEND__ANON_KEY").ok()?;
    if url.is_empty() || !url.starts_with("http") || anon_key.is_empty() {
        return None;
    }
    Some(BackendConfig {
        url,
        anon_key,
        sync_interval_secs: 60,
    })
}

fn test_credentials() -> Option<(String, String)> {
    load_env();
    let email = std::env::var("TALLY_AUTH__TEST_EMAIL").ok()?;
    let password = std::env::var("TALLY_AUTH__TEST_PASSWORD").ok()?;
    if email.is_empty() || password.is_empty() {
        return None;
    }
    Some((email, password))
}

fn connect() -> Option<RemoteBackend> {
    let config = backend_config()?;
    match RemoteBackend::connect(&config) {
        Ok(backend) => Some(backend),
        Err(e) => {
            eprintln!("SKIP: could not build HTTP client: {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn live_health_check() {
    let Some(backend) = connect() else {
        eprintln!("SKIP: TALLY_BACKEND__URL / TALLY_BACKEND__ANON_KEY not set");
        return;
    };

    assert_eq!(backend.mode(), BackendMode::Remote);
    backend.health().await.expect("health probe");
    println!("health: ok");
}

#[tokio::test]
async fn live_catalog_lists() {
    let Some(backend) = connect() else {
        eprintln!("SKIP: TALLY_BACKEND__URL / TALLY_BACKEND__ANON_KEY not set");
        return;
    };

    let categories = backend.fetch_categories().await.expect("categories");
    println!("categories: {}", categories.len());
    for category in &categories {
        println!("  [{}] {}", category.sort_order, category.name);
    }
    assert!(
        categories
            .windows(2)
            .all(|pair| pair[0].sort_order <= pair[1].sort_order),
        "categories should come back ordered by sort_order"
    );

    let templates = backend
        .fetch_templates(&TemplateFilter {
            is_published: Some(true),
            limit: Some(10),
            ..TemplateFilter::default()
        })
        .await
        .expect("templates");
    println!("published templates: {}", templates.len());
    for template in &templates {
        println!("  {} v{} ({})", template.name, template.version, template.id);
    }
}

#[tokio::test]
async fn live_sign_in_round_trip() {
    let Some(backend) = connect() else {
        eprintln!("SKIP: TALLY_BACKEND__URL / TALLY_BACKEND__ANON_KEY not set");
        return;
    };
    let Some((email, password)) = test_credentials() else {
        eprintln!("SKIP: TALLY_AUTH__TEST_EMAIL / TALLY_AUTH__TEST_PASSWORD not set");
        return;
    };

    let session = backend
        .sign_in(&email, &password)
        .await
        .expect("password sign-in");
    println!("signed in as {} ({})", session.user.email, session.user.id);
    assert!(!session.access_token.is_empty());
    assert!(!session.is_expired());

    let restored = backend.session().await;
    assert_eq!(restored.map(|s| s.user.id), Some(session.user.id.clone()));

    match backend.get_profile(&session.user.id).await {
        Ok(profile) => println!("profile: {} ({})", profile.name, profile.role),
        Err(e) => println!("no profile row yet: {e}"),
    }

    backend.sign_out().await.expect("sign-out");
    assert!(backend.session().await.is_none());
}
