// src/cli/login.rs — Phone + SMS-code login flow

use anyhow::Result;

use crate::session::SessionManager;

pub async fn run_login(manager: &mut SessionManager, phone: Option<String>) -> Result<()> {
    let phone = match phone {
        Some(p) => p,
        None => inquire::Text::new("Phone number:").prompt()?,
    };

    manager.request_code(&phone).await?;
    println!("Verification code sent to {phone}.");

    let code = inquire::Text::new("SMS code:").prompt()?;
    manager.login(&phone, &code).await?;

    // login() only returns Ok with a session in place
    if let Some(session) = manager.session() {
        println!("Logged in as {}.", session.display_name);
    }
    Ok(())
}

pub fn run_logout(manager: &mut SessionManager) -> Result<()> {
    let was_authenticated = manager.is_authenticated();
    manager.logout()?;
    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}
