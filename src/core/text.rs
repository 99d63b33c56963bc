//! 文字處理核心：正規化反轉與 email 格式檢查。
//!
//! 兩個操作都是純函數，沒有共享可變狀態，可以在任意執行緒同時呼叫。

use crate::domain::model::TextRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Email 格式的固定樣式（不分大小寫，頭尾錨定）。
///
/// `-u` 關閉 Unicode，讓字母與數字類別只比對 ASCII。
pub static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)\A[a-z0-9_+\-.]+@[a-z0-9\-.]+\.[a-z]+\z")
        .expect("email pattern is a valid regex")
});

/// 去除前後空白、轉成大寫，再反轉字元順序。
///
/// ```
/// use text_pipeline::normalize_and_reverse;
///
/// assert_eq!(normalize_and_reverse("  hello world  "), "DLROW OLLEH");
/// assert_eq!(normalize_and_reverse(""), "");
/// ```
pub fn normalize_and_reverse(input: &str) -> String {
    input.trim().to_uppercase().chars().rev().collect()
}

/// 檢查整個字串是否像一個 email 位址（只做語法檢查）。
///
/// ```
/// use text_pipeline::is_plausible_email;
///
/// assert!(is_plausible_email("test@example.com"));
/// assert!(!is_plausible_email("not-an-email"));
/// ```
pub fn is_plausible_email(input: &str) -> bool {
    EMAIL_PATTERN.is_match(input)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextPipeline;

impl TextPipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize_and_reverse(&self, input: &str) -> String {
        normalize_and_reverse(input)
    }

    pub fn is_plausible_email(&self, input: &str) -> bool {
        is_plausible_email(input)
    }

    /// 對單行套用兩個操作；email 檢查使用去除前後空白後的內容
    pub fn process(&self, line_number: usize, input: &str) -> TextRecord {
        TextRecord {
            line_number,
            input: input.to_string(),
            normalized: self.normalize_and_reverse(input),
            plausible_email: self.is_plausible_email(input.trim()),
        }
    }
}
