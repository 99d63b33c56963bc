use crate::domain::model::{SourceLine, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn max_records(&self) -> Option<usize>;
    fn skip_blank_lines(&self) -> bool;
    fn emails_only(&self) -> bool;
    /// 依格式取得輸出檔名
    fn file_name(&self, format: &str) -> String;
    /// 啟用壓縮時回傳 ZIP 檔名
    fn archive_name(&self) -> Option<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceLine>>;
    async fn transform(&self, lines: Vec<SourceLine>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
