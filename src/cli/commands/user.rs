use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

pub async fn cmd_user_add(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone());

    let created = auth.create_user(username, password).await?;

    println!("✓ Created user {}", created.username);
    println!("  API key: {}", created.api_key);

    Ok(())
}
