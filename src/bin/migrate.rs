use nonprofit_site::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if it exists
    dotenvy::dotenv().ok();

    println!("Starting database migration...");

    let pool = db::init_pool().await?;
    db::apply_schema(&pool).await?;

    println!("Migration complete.");
    Ok(())
}
