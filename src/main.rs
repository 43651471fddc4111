use anyhow::Context;
use catalog_kernel::{settings::Settings, InitCtx};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        seed = ?settings.database.seed_path,
        "catalog-app bootstrap starting"
    );

    let store = catalog_db::connect(
        settings.database.seed_path.as_deref(),
        catalog_app::validation::escape,
    )
    .await
    .with_context(|| "failed to open document store")?;

    let registry = catalog_app::build_registry(&store);
    let ctx = InitCtx {
        settings: &settings,
        store: &store,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("catalog-app bootstrap complete");

    let served = catalog_http::start_server(&registry, &settings, catalog_app::MOUNT_PATH).await;

    registry.stop_all().await?;
    store
        .close()
        .await
        .with_context(|| "failed to close document store")?;

    served
}
