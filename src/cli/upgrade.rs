// src/cli/upgrade.rs — Plan upgrade via payment order

use anyhow::Result;

use crate::api::types::{ApiOutcome, PaymentMethod};
use crate::infra::errors::ProxydashError;
use crate::session::SessionManager;

pub async fn run_upgrade(
    manager: &SessionManager,
    plan_id: i64,
    method: PaymentMethod,
) -> Result<()> {
    let Some(session) = manager.session() else {
        return Err(ProxydashError::NotAuthenticated.into());
    };

    let order = match manager
        .api()
        .create_order(plan_id, method, &session.id)
        .await?
    {
        ApiOutcome::Success(order) => order,
        ApiOutcome::Failure { code, message } => {
            anyhow::bail!("order creation rejected (code {code}): {message}");
        }
    };

    if let Some(order_no) = order.order_no.as_deref() {
        println!("Order {order_no} created.");
    }
    if let Some(amount) = order.amount {
        println!("Amount: ¥{amount:.2}");
    }
    // The payment URL is handed over exactly as the backend sent it
    println!("Open this URL to complete payment:");
    println!("{}", order.payment_url);

    Ok(())
}
