//! Fake LLM Client - 用于测试的翻译模型客户端
//!
//! 始终返回固定文本（或固定错误），不实际调用模型服务

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{LlmClientPort, LlmError};

/// 最多保留的提示词条数，超出时丢弃最早的
pub const MAX_RECORDED_PROMPTS: usize = 32;

/// Fake LLM Client 配置
#[derive(Debug, Clone)]
pub struct FakeLlmClientConfig {
    /// 固定返回的原始文本
    pub response: String,
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeLlmClientConfig {
    fn default() -> Self {
        Self {
            response: "CHAPTER_TITLE: Fake Chapter\nTRANSLATION: This is a fake translation.\nNEW_TERMS:"
                .to_string(),
            latency_ms: 0,
        }
    }
}

/// Fake LLM Client
///
/// 记录最近收到的提示词，便于测试断言
pub struct FakeLlmClient {
    config: FakeLlmClientConfig,
    failure: Option<String>,
    prompts: Mutex<VecDeque<(String, String)>>,
}

impl FakeLlmClient {
    pub fn new(config: FakeLlmClientConfig) -> Self {
        tracing::info!(latency_ms = config.latency_ms, "FakeLlmClient initialized");
        Self {
            config,
            failure: None,
            prompts: Mutex::new(VecDeque::new()),
        }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeLlmClientConfig::default())
    }

    /// 返回指定文本
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::new(FakeLlmClientConfig {
            response: response.into(),
            ..Default::default()
        })
    }

    /// 每次调用都以服务错误失败
    pub fn failing(message: impl Into<String>) -> Self {
        let mut client = Self::with_defaults();
        client.failure = Some(message.into());
        client
    }

    /// 最近收到的 (system, user) 提示词，按时间先后排列
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts
            .lock()
            .map(|p| p.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClientPort for FakeLlmClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            if prompts.len() == MAX_RECORDED_PROMPTS {
                prompts.pop_front();
            }
            prompts.push_back((system_prompt.to_string(), user_prompt.to_string()));
        }

        tracing::debug!(
            user_prompt_len = user_prompt.len(),
            "FakeLlmClient: returning fixed response"
        );

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        match &self.failure {
            Some(message) => Err(LlmError::ServiceError(message.clone())),
            None => Ok(self.config.response.clone()),
        }
    }

    fn model(&self) -> &str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_client_returns_service_error() {
        let client = FakeLlmClient::failing("quota exceeded");
        let result = client.complete("sys", "user").await;
        assert!(matches!(result, Err(LlmError::ServiceError(m)) if m == "quota exceeded"));
        assert_eq!(client.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_prompt_log_keeps_most_recent() {
        let client = FakeLlmClient::with_defaults();
        let total = MAX_RECORDED_PROMPTS + 8;
        for i in 0..total {
            client.complete("sys", &format!("chapter {}", i)).await.unwrap();
        }

        let prompts = client.prompts();
        assert_eq!(prompts.len(), MAX_RECORDED_PROMPTS);
        assert_eq!(prompts[0].1, "chapter 8");
        assert_eq!(prompts[MAX_RECORDED_PROMPTS - 1].1, format!("chapter {}", total - 1));
    }
}
