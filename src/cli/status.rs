// src/cli/status.rs — Account and usage overview

use anyhow::Result;
use chrono::{Local, TimeZone};

use crate::infra::errors::ProxydashError;
use crate::session::SessionManager;

pub async fn show_status(manager: &mut SessionManager) -> Result<()> {
    if !manager.is_authenticated() {
        return Err(ProxydashError::NotAuthenticated.into());
    }

    // Stale data stays on screen when the backend hiccups
    if let Err(e) = manager.refresh_all().await {
        eprintln!("warning: could not refresh, showing cached data ({e})");
    }

    let Some(session) = manager.session() else {
        return Err(ProxydashError::NotAuthenticated.into());
    };

    println!("proxydash v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("  Account:    {} ({})", session.display_name, session.phone);

    if let Some(profile) = &session.profile {
        if let Some(key) = &profile.api_key {
            println!("  API key:    {}", mask_key(key));
        }
        println!(
            "  Plan:       {} ({})",
            profile.subscription_type.as_deref().unwrap_or("none"),
            profile.subscription_status.as_deref().unwrap_or("unknown"),
        );
        if let (Some(start), Some(end)) = (profile.subscription_start, profile.subscription_end) {
            println!(
                "  Window:     {} → {}",
                format_millis(start),
                format_millis(end)
            );
        }
        if let Some(config) = &profile.subscription_config {
            if let Some(limit) = config.token_limit {
                println!("  Token cap:  {limit}");
            }
            if let (Some(window), Some(requests)) =
                (config.rate_limit_window_minutes, config.rate_limit_requests)
            {
                println!("  Rate limit: {requests} requests / {window} min");
            }
        }
    }

    if let Some(stats) = &session.stats {
        println!();
        println!("  Usage:");
        println!("    Requests:   {}", stats.request_count);
        println!(
            "    Tokens:     {} in / {} out ({} total)",
            stats.input_tokens, stats.output_tokens, stats.total_tokens
        );
        println!(
            "    Cache:      {} written / {} read",
            stats.cache_write_tokens, stats.cache_read_tokens
        );
        println!("    Cost:       ${:.4}", stats.total_cost);
    } else {
        println!();
        println!("  Usage:      (no stats available)");
    }

    Ok(())
}

/// Show only the first and last few characters of the API key. The key is a
/// backend-owned string, so slicing is only safe once it's known ASCII.
fn mask_key(key: &str) -> String {
    if key.is_ascii() && key.len() > 12 {
        format!("{}…{}", &key[..8], &key[key.len() - 4..])
    } else {
        "*".repeat(key.chars().count())
    }
}

fn format_millis(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| millis.to_string())
}
