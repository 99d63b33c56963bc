use crate::core::ConfigProvider;
use crate::utils::error::{PipelineError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const SUPPORTED_FORMATS: [&str; 4] = ["txt", "csv", "tsv", "json"];
pub const DEFAULT_ARCHIVE_NAME: &str = "text_output.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    pub max_records: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    pub skip_blank_lines: Option<bool>,
    pub emails_only: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub txt: Option<String>,
    pub csv: Option<String>,
    pub tsv: Option<String>,
    pub json: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PipelineError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PipelineError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INPUT_FILE})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_output_path("load.output_path", &self.load.output_path)?;

        if let Some(max) = self.source.max_records {
            validation::validate_positive_number("source.max_records", max, 1)?;
        }

        validation::validate_output_formats(
            "load.output_formats",
            &self.load.output_formats,
            &SUPPORTED_FORMATS,
        )?;

        if let Some(filenames) = &self.load.filenames {
            let named = [
                ("load.filenames.txt", &filenames.txt),
                ("load.filenames.csv", &filenames.csv),
                ("load.filenames.tsv", &filenames.tsv),
                ("load.filenames.json", &filenames.json),
            ];
            for (field, name) in named {
                if let Some(name) = name {
                    validation::validate_file_name(field, name)?;
                }
            }
        }

        if let Some(compression) = &self.load.compression {
            if let Some(name) = &compression.filename {
                validation::validate_file_name("load.compression.filename", name)?;
            }
        }

        // 不同格式不能寫到同一個檔案
        let mut file_names = HashSet::new();
        for format in &self.load.output_formats {
            let name = self.file_name(format);
            if !file_names.insert(name.clone()) {
                return Err(PipelineError::InvalidConfigValueError {
                    field: format!("load.filenames.{}", format),
                    value: name,
                    reason: "File name is already used by another output format".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn compression_enabled(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn max_records(&self) -> Option<usize> {
        self.source.max_records
    }

    fn skip_blank_lines(&self) -> bool {
        self.transform.skip_blank_lines.unwrap_or(true)
    }

    fn emails_only(&self) -> bool {
        self.transform.emails_only.unwrap_or(false)
    }

    fn file_name(&self, format: &str) -> String {
        let configured = self.load.filenames.as_ref().and_then(|f| match format {
            "txt" => f.txt.clone(),
            "csv" => f.csv.clone(),
            "tsv" => f.tsv.clone(),
            "json" => f.json.clone(),
            _ => None,
        });
        configured.unwrap_or_else(|| format!("output.{}", format))
    }

    fn archive_name(&self) -> Option<String> {
        if !self.compression_enabled() {
            return None;
        }
        let name = self
            .load
            .compression
            .as_ref()
            .and_then(|c| c.filename.clone())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string());
        Some(name)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
