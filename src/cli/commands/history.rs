use crate::config::Config;
use crate::db::Store;

pub async fn cmd_history(config: &Config, username: &str, limit: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let records = store.recent_history(username, limit).await?;

    if records.is_empty() {
        println!("No history for {username}.");
        return Ok(());
    }

    println!("Recent requests for {} (last {}):", username, records.len());
    println!("{:-<70}", "");

    for record in records {
        println!("• {}", record.user_preferences);
        println!("  {}", record.created_at);
    }

    Ok(())
}
