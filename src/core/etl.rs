use crate::core::Pipeline;
use crate::domain::model::BatchSummary;
use crate::utils::error::Result;

/// 批次執行結果
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub output_path: String,
    pub summary: BatchSummary,
    pub records_written: usize,
}

pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<BatchReport> {
        tracing::info!("Starting batch run");

        // Extract
        let lines = self.pipeline.extract().await?;
        tracing::info!("Extracted {} lines", lines.len());

        // Transform
        let result = self.pipeline.transform(lines).await?;
        tracing::info!(
            "Transformed {} lines ({} blank skipped, {} plausible emails)",
            result.summary.processed,
            result.summary.skipped_blank,
            result.summary.plausible_emails
        );
        let summary = result.summary.clone();
        let records_written = result.records.len();

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(BatchReport {
            output_path,
            summary,
            records_written,
        })
    }
}
