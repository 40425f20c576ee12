use anyhow::{bail, Context};
use serde_json::json;

use crate::auth::PasswordHasher;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(password: &str, cost: Option<u32>, output_format: OutputFormat) -> anyhow::Result<()> {
    if password.is_empty() {
        bail!("Password cannot be empty");
    }

    let cost = cost.unwrap_or_else(|| AppConfig::from_env().security.password_hash_cost);
    if !(4..=31).contains(&cost) {
        bail!("bcrypt cost must be between 4 and 31, got {}", cost);
    }

    let hash = PasswordHasher::new(cost)
        .hash(password)
        .context("Failed to hash password")?;

    match output_format {
        OutputFormat::Text => println!("{}", hash),
        OutputFormat::Json => println!("{}", json!({ "password_hash": hash, "cost": cost })),
    }
    Ok(())
}
