use anyhow::Result;
use playlist_analyzer_rust::{Config, PlaylistId, VideoCatalog, YouTubeCatalog};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("playlist_analyzer_rust=info,check_catalog=info")
        .init();

    info!("🔍 Checking catalog configuration...");

    let config = Config::load()?;
    info!("{}", config.summary());

    if let Err(e) = config.validate_for_catalog() {
        info!("❌ {}", e);
        info!("💡 Export YOUTUBE_API_KEY or add api_key under [catalog] in playlist-analyzer.toml");
        return Ok(());
    }

    let catalog = YouTubeCatalog::new(config.catalog.clone())?;
    info!("✅ Catalog client ready ({})", catalog.provider_name());

    let Some(url) = std::env::args().nth(1) else {
        info!("💡 Pass a playlist URL to test a live lookup: check-catalog <url>");
        return Ok(());
    };

    let playlist_id = PlaylistId::from_url(&url)?;
    info!("📋 Looking up playlist {}...", playlist_id);

    match catalog.playlist_metadata(&playlist_id).await {
        Ok(metadata) => info!("   - {} by {}", metadata.title, metadata.channel_name),
        Err(e) => info!("   ❌ Metadata lookup failed: {}", e),
    }

    match catalog.playlist_items(&playlist_id, None).await {
        Ok(page) => info!(
            "   - First page: {} items, more pages: {}",
            page.video_ids.len(),
            page.next_page_token.is_some()
        ),
        Err(e) => info!("   ❌ Item listing failed: {}", e),
    }

    info!("🎉 Catalog check finished");
    Ok(())
}
