use stockflow_etl::config::Config;
use stockflow_etl::{build_transformation_workflow, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let result = async {
        let config = Config::from_env()?;
        let workflow = build_transformation_workflow(&config).await?;
        workflow.run().await
    }
    .await;

    match result {
        Ok(report) => {
            tracing::info!(
                "Transformed {} records from {} into {}",
                report.record_count,
                report.source,
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
