// src/cli/plans.rs — Subscription plan listing

use anyhow::Result;

use crate::api::types::ApiOutcome;
use crate::session::SessionManager;

pub async fn show_plans(manager: &SessionManager) -> Result<()> {
    let plans = match manager.api().subscription_plans().await? {
        ApiOutcome::Success(plans) => plans,
        ApiOutcome::Failure { code, message } => {
            anyhow::bail!("backend rejected plan listing (code {code}): {message}");
        }
    };

    if plans.is_empty() {
        println!("No plans available.");
        return Ok(());
    }

    println!("{:<4} {:<16} {:>10} {:>14} {:>12}", "ID", "PLAN", "PRICE/MO", "TOKEN LIMIT", "CONCURRENCY");
    for plan in &plans {
        println!(
            "{:<4} {:<16} {:>10} {:>14} {:>12}",
            plan.id,
            plan.name.as_deref().unwrap_or("-"),
            plan.monthly_price
                .map(|p| format!("¥{p:.2}"))
                .unwrap_or_else(|| "-".into()),
            plan.token_limit
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".into()),
            plan.concurrency_limit
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".into()),
        );
        if let Some(permissions) = plan.permissions.as_deref() {
            println!("     {permissions}");
        }
        if plan.model_restricted {
            println!("     (restricted model list)");
        }
    }

    Ok(())
}
