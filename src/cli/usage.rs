// src/cli/usage.rs — Per-model usage tables

use anyhow::Result;

use crate::api::types::{ApiOutcome, Period};
use crate::infra::errors::ProxydashError;
use crate::session::SessionManager;

pub async fn show_usage(manager: &SessionManager, period: Period) -> Result<()> {
    let Some(session) = manager.session() else {
        return Err(ProxydashError::NotAuthenticated.into());
    };

    let models = match manager.api().model_stats(&session.id, period).await {
        Ok(ApiOutcome::Success(models)) => models,
        Ok(ApiOutcome::Failure { code, message }) => {
            // Transient backend hiccups shouldn't kill the dashboard
            eprintln!("warning: backend rejected usage query (code {code}): {message}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("warning: could not fetch usage: {e}");
            return Ok(());
        }
    };

    if models.is_empty() {
        println!("No {period} usage recorded.");
        return Ok(());
    }

    println!("Per-model usage ({period})");
    println!();
    println!(
        "{:<28} {:>9} {:>12} {:>12} {:>10}",
        "MODEL", "REQUESTS", "TOKENS IN", "TOKENS OUT", "COST"
    );
    for m in &models {
        let cost = m
            .total_cost_display
            .clone()
            .unwrap_or_else(|| format!("${:.4}", m.total_cost));
        println!(
            "{:<28} {:>9} {:>12} {:>12} {:>10}",
            m.model, m.requests, m.input_tokens, m.output_tokens, cost
        );
    }

    Ok(())
}
