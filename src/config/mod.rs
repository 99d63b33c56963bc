pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::text::TextPipeline;
#[cfg(feature = "cli")]
use crate::utils::error::{PipelineError, Result};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::io::BufRead;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "text-pipeline")]
#[command(about = "Trim, uppercase and reverse text, or check whether it looks like an email address")]
pub struct CliConfig {
    /// Text to process. One line is read from standard input when omitted
    pub text: Option<String>,

    #[arg(long, help = "Check email plausibility instead of reversing")]
    pub email: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 取得要處理的文字：優先使用參數，否則從 reader 讀取一行
    pub fn resolve_input<R: BufRead>(&self, mut reader: R) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        let mut bytes = Vec::new();
        let read = reader.read_until(b'\n', &mut bytes)?;
        if read == 0 {
            return Err(PipelineError::MissingInputError);
        }

        // 去掉行尾換行符號，空行仍是合法輸入
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }

        // 無效的 UTF-8 以替代字元表示
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// 依模式產生要輸出的結果
    pub fn render(&self, input: &str) -> String {
        let pipeline = TextPipeline::new();
        if self.email {
            pipeline.is_plausible_email(input).to_string()
        } else {
            pipeline.normalize_and_reverse(input)
        }
    }
}
