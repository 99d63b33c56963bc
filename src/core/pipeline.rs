use crate::core::text::TextPipeline;
use crate::core::{ConfigProvider, Pipeline, SourceLine, Storage, TransformResult};
use crate::domain::model::{BatchSummary, TextRecord};
use crate::utils::error::{PipelineError, Result};
use crate::utils::validation::STDIN_PATH;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncReadExt;
use zip::write::{FileOptions, ZipWriter};

const TABLE_HEADER: [&str; 4] = ["line", "input", "normalized", "plausible_email"];

/// 逐行處理文字來源的 Pipeline
pub struct LinePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    text: TextPipeline,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a BatchSummary,
    records: &'a [TextRecord],
}

impl<S: Storage, C: ConfigProvider> LinePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            text: TextPipeline::new(),
        }
    }

    async fn read_source(&self) -> Result<String> {
        let path = self.config.input_path();
        let bytes = if path == STDIN_PATH {
            tracing::debug!("Reading lines from standard input");
            let mut buffer = Vec::new();
            tokio::io::stdin().read_to_end(&mut buffer).await?;
            buffer
        } else {
            tracing::debug!("Reading lines from: {}", path);
            self.storage.read_file(path).await?
        };

        String::from_utf8(bytes).map_err(|e| PipelineError::ProcessingError {
            message: format!("Input '{}' is not valid UTF-8: {}", path, e),
        })
    }

    fn render(&self, format: &str, result: &TransformResult) -> Result<Vec<u8>> {
        match format {
            "txt" => {
                let mut out = String::new();
                for record in &result.records {
                    out.push_str(&record.normalized);
                    out.push('\n');
                }
                Ok(out.into_bytes())
            }
            "csv" => render_table(b',', &result.records),
            "tsv" => render_table(b'\t', &result.records),
            "json" => {
                let output = JsonOutput {
                    summary: &result.summary,
                    records: &result.records,
                };
                Ok(serde_json::to_vec_pretty(&output)?)
            }
            other => Err(PipelineError::ProcessingError {
                message: format!("Unsupported output format: {}", other),
            }),
        }
    }
}

/// 以 csv crate 輸出表格，TSV 只是換了分隔符號
fn render_table(delimiter: u8, records: &[TextRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(TABLE_HEADER)?;
    for record in records {
        writer.write_record([
            record.line_number.to_string(),
            record.input.clone(),
            record.normalized.clone(),
            record.plausible_email.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| PipelineError::ProcessingError {
            message: format!("Failed to flush table output: {}", e),
        })
}

fn join_output(dir: &str, file_name: &str) -> String {
    Path::new(dir).join(file_name).to_string_lossy().into_owned()
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LinePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceLine>> {
        let content = self.read_source().await?;
        let limit = self.config.max_records().unwrap_or(usize::MAX);

        let lines: Vec<SourceLine> = content
            .lines()
            .take(limit)
            .enumerate()
            .map(|(index, text)| SourceLine {
                line_number: index + 1,
                text: text.to_string(),
            })
            .collect();

        tracing::debug!("Extracted {} lines", lines.len());
        Ok(lines)
    }

    async fn transform(&self, lines: Vec<SourceLine>) -> Result<TransformResult> {
        let total_lines = lines.len();
        let skip_blank = self.config.skip_blank_lines();

        let (kept, skipped): (Vec<SourceLine>, Vec<SourceLine>) = lines
            .into_iter()
            .partition(|line| !skip_blank || !line.text.trim().is_empty());

        let processed: Vec<TextRecord> = kept
            .iter()
            .map(|line| self.text.process(line.line_number, &line.text))
            .collect();

        let plausible_emails = processed.iter().filter(|r| r.plausible_email).count();
        let longest_normalized = processed
            .iter()
            .map(|r| r.normalized.chars().count())
            .fold(0, usize::max);

        let summary = BatchSummary {
            total_lines,
            processed: processed.len(),
            skipped_blank: skipped.len(),
            plausible_emails,
            longest_normalized,
            generated_at: chrono::Utc::now(),
        };

        let records = if self.config.emails_only() {
            processed.into_iter().filter(|r| r.plausible_email).collect()
        } else {
            processed
        };

        tracing::debug!(
            "Transformed {} lines ({} skipped, {} plausible emails)",
            summary.processed,
            summary.skipped_blank,
            summary.plausible_emails
        );

        Ok(TransformResult { records, summary })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_dir = self.config.output_path();
        let formats = self.config.output_formats();

        let mut rendered = Vec::with_capacity(formats.len());
        for format in formats {
            let file_name = self.config.file_name(format);
            rendered.push((file_name, self.render(format, &result)?));
        }

        if let Some(archive_name) = self.config.archive_name() {
            tracing::debug!("Creating ZIP file with {} files", rendered.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (file_name, data) in &rendered {
                    zip.start_file::<_, ()>(file_name.as_str(), FileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            let archive_path = join_output(output_dir, &archive_name);
            tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), archive_path);
            self.storage.write_file(&archive_path, &zip_data).await?;
            return Ok(archive_path);
        }

        for (file_name, data) in &rendered {
            let path = join_output(output_dir, file_name);
            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            self.storage.write_file(&path, data).await?;
        }

        Ok(output_dir.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put_file(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                PipelineError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        output_formats: Vec<String>,
        max_records: Option<usize>,
        skip_blank_lines: bool,
        emails_only: bool,
        archive: Option<String>,
    }

    impl MockConfig {
        fn new(formats: &[&str]) -> Self {
            Self {
                input_path: "input.txt".to_string(),
                output_formats: formats.iter().map(|f| f.to_string()).collect(),
                max_records: None,
                skip_blank_lines: true,
                emails_only: false,
                archive: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn max_records(&self) -> Option<usize> {
            self.max_records
        }

        fn skip_blank_lines(&self) -> bool {
            self.skip_blank_lines
        }

        fn emails_only(&self) -> bool {
            self.emails_only
        }

        fn file_name(&self, format: &str) -> String {
            format!("output.{}", format)
        }

        fn archive_name(&self) -> Option<String> {
            self.archive.clone()
        }
    }

    const INPUT: &str = "  hello world  \n\ntest@example.com\r\nnot-an-email\n   \na.b+c@sub.example.co\n";

    fn out_path(name: &str) -> String {
        join_output("out", name)
    }

    #[tokio::test]
    async fn test_extract_numbers_lines() {
        let storage = MockStorage::default();
        storage.put_file("input.txt", INPUT).await;
        let pipeline = LinePipeline::new(storage, MockConfig::new(&["txt"]));

        let lines = pipeline.extract().await.unwrap();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].line_number, 1);
        assert_eq!(lines[0].text, "  hello world  ");
        assert_eq!(lines[2].text, "test@example.com");
    }

    #[tokio::test]
    async fn test_extract_respects_max_records() {
        let storage = MockStorage::default();
        storage.put_file("input.txt", INPUT).await;
        let mut config = MockConfig::new(&["txt"]);
        config.max_records = Some(2);
        let pipeline = LinePipeline::new(storage, config);

        let lines = pipeline.extract().await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "");
    }

    #[tokio::test]
    async fn test_extract_missing_input_fails() {
        let pipeline = LinePipeline::new(MockStorage::default(), MockConfig::new(&["txt"]));
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, PipelineError::IoError(_)));
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_utf8() {
        let storage = MockStorage::default();
        storage
            .write_file("input.txt", &[0x66, 0x6f, 0xff, 0x0a])
            .await
            .unwrap();
        let pipeline = LinePipeline::new(storage, MockConfig::new(&["txt"]));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, PipelineError::ProcessingError { .. }));
    }

    #[tokio::test]
    async fn test_transform_skips_blank_lines_and_counts_emails() {
        let storage = MockStorage::default();
        storage.put_file("input.txt", INPUT).await;
        let pipeline = LinePipeline::new(storage, MockConfig::new(&["txt"]));

        let lines = pipeline.extract().await.unwrap();
        let result = pipeline.transform(lines).await.unwrap();

        assert_eq!(result.summary.total_lines, 6);
        assert_eq!(result.summary.skipped_blank, 2);
        assert_eq!(result.summary.processed, 4);
        assert_eq!(result.summary.plausible_emails, 2);
        assert_eq!(result.summary.longest_normalized, "a.b+c@sub.example.co".len());

        assert_eq!(result.records[0].normalized, "DLROW OLLEH");
        assert_eq!(result.records[1].line_number, 3);
        assert!(result.records[1].plausible_email);
        assert!(!result.records[2].plausible_email);
    }

    #[tokio::test]
    async fn test_transform_keeps_blank_lines_when_configured() {
        let mut config = MockConfig::new(&["txt"]);
        config.skip_blank_lines = false;
        let pipeline = LinePipeline::new(MockStorage::default(), config);

        let lines = vec![
            SourceLine {
                line_number: 1,
                text: "  ".to_string(),
            },
            SourceLine {
                line_number: 2,
                text: "ab".to_string(),
            },
        ];
        let result = pipeline.transform(lines).await.unwrap();

        assert_eq!(result.summary.skipped_blank, 0);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].normalized, "");
    }

    #[tokio::test]
    async fn test_transform_emails_only() {
        let storage = MockStorage::default();
        storage.put_file("input.txt", INPUT).await;
        let mut config = MockConfig::new(&["txt"]);
        config.emails_only = true;
        let pipeline = LinePipeline::new(storage, config);

        let lines = pipeline.extract().await.unwrap();
        let result = pipeline.transform(lines).await.unwrap();

        assert_eq!(result.summary.processed, 4);
        assert_eq!(result.records.len(), 2);
        assert!(result.records.iter().all(|r| r.plausible_email));
    }

    #[tokio::test]
    async fn test_transform_empty_input() {
        let pipeline = LinePipeline::new(MockStorage::default(), MockConfig::new(&["txt"]));
        let result = pipeline.transform(Vec::new()).await.unwrap();

        assert_eq!(result.summary.total_lines, 0);
        assert_eq!(result.summary.longest_normalized, 0);
        assert!(result.records.is_empty());
    }

    #[tokio::test]
    async fn test_load_writes_every_format() {
        let storage = MockStorage::default();
        storage.put_file("input.txt", INPUT).await;
        let pipeline = LinePipeline::new(
            storage.clone(),
            MockConfig::new(&["txt", "csv", "tsv", "json"]),
        );

        let lines = pipeline.extract().await.unwrap();
        let result = pipeline.transform(lines).await.unwrap();
        let path = pipeline.load(result).await.unwrap();
        assert_eq!(path, "out");

        let txt = storage.get_file(&out_path("output.txt")).await.unwrap();
        let txt = String::from_utf8(txt).unwrap();
        assert_eq!(txt.lines().next(), Some("DLROW OLLEH"));
        assert_eq!(txt.lines().count(), 4);

        let csv = String::from_utf8(storage.get_file(&out_path("output.csv")).await.unwrap()).unwrap();
        assert!(csv.starts_with("line,input,normalized,plausible_email\n"));
        assert!(csv.contains("3,test@example.com,MOC.ELPMAXE@TSET,true"));

        let tsv = String::from_utf8(storage.get_file(&out_path("output.tsv")).await.unwrap()).unwrap();
        assert!(tsv.starts_with("line\tinput\tnormalized\tplausible_email\n"));

        let json = storage.get_file(&out_path("output.json")).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["summary"]["plausible_emails"], 2);
        assert_eq!(value["records"][0]["normalized"], "DLROW OLLEH");
        assert_eq!(value["records"][0]["line"], 1);
    }

    #[tokio::test]
    async fn test_load_bundles_zip_archive() {
        let storage = MockStorage::default();
        storage.put_file("input.txt", INPUT).await;
        let mut config = MockConfig::new(&["csv", "json"]);
        config.archive = Some("bundle.zip".to_string());
        let pipeline = LinePipeline::new(storage.clone(), config);

        let lines = pipeline.extract().await.unwrap();
        let result = pipeline.transform(lines).await.unwrap();
        let path = pipeline.load(result).await.unwrap();
        assert_eq!(path, out_path("bundle.zip"));

        assert!(storage.get_file(&out_path("output.csv")).await.is_none());

        let zip_data = storage.get_file(&path).await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["output.csv".to_string(), "output.json".to_string()]);
    }
}
