use stockflow_etl::config::Config;
use stockflow_etl::{build_ingestion_workflow, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let result = async {
        let config = Config::from_env()?;
        let workflow = build_ingestion_workflow(&config).await?;
        workflow.run().await
    }
    .await;

    match result {
        Ok(report) => {
            tracing::info!(
                "Ingested {} symbols into {}",
                report.symbol_count,
                report.object
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(kind = %e.kind(), "An error occurred: {}", e);
            Err(e.into())
        }
    }
}
