// src/cli/backend.rs — Backend origin configuration

use anyhow::Result;

use crate::session::SessionManager;

pub fn run_backend(manager: &SessionManager, url: Option<String>) -> Result<()> {
    match url {
        Some(url) => {
            manager.set_backend(&url)?;
            println!("Backend set to {url}");
        }
        None => println!("{}", manager.backend()),
    }
    Ok(())
}
