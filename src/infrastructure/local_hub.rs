//! 本地判分 hub
//!
//! 进程内的远端判分方：出题、判分、回执都通过与真实 hub 相同的消息外形推送，
//! 既用于命令行程序，也用于不依赖网络的测试

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value as JsonValue;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::channel::{ChannelAdapter, ChannelMessage};
use crate::config::Config;
use crate::error::ChannelError;
use crate::models::{EventKind, NewQuestionPayload, ReceiveResultPayload, UserAnswer};
use crate::services::SUBMIT_ANSWER;

/// hub 配置
#[derive(Debug, Clone)]
pub struct HubSettings {
    /// 定时出题间隔，None 表示只在判分后出题
    pub question_interval: Option<Duration>,
    pub seed: u64,
    /// 最多出题数量，0 表示不限
    pub max_questions: usize,
    pub event_buffer: usize,
}

impl HubSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            question_interval: (config.question_interval_ms > 0)
                .then(|| Duration::from_millis(config.question_interval_ms)),
            seed: config.question_seed,
            max_questions: config.max_questions,
            event_buffer: config.event_buffer.max(1),
        }
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 出题器
///
/// 大约一半题目的提议答案是错的
struct QuestionGenerator {
    rng: StdRng,
}

impl QuestionGenerator {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn next_question(&mut self) -> NewQuestionPayload {
        let a: i64 = self.rng.random_range(1..=12);
        let b: i64 = self.rng.random_range(1..=12);

        let (left, correct) = match self.rng.random_range(0..4) {
            0 => (format!("{} + {}", a, b), a + b),
            1 => (format!("{} - {}", a, b), a - b),
            2 => (format!("{} * {}", a, b), a * b),
            // 只出整除的除法
            _ => (format!("{} / {}", a * b, b), a),
        };

        let proposed = if self.rng.random_bool(0.5) {
            correct
        } else {
            let offset: i64 = self.rng.random_range(1..=3);
            if self.rng.random_bool(0.5) {
                correct + offset
            } else {
                correct - offset
            }
        };

        NewQuestionPayload {
            expression: format!("{} = {}", left, proposed),
            correct_answer: correct as f64,
        }
    }
}

struct HubState {
    generator: QuestionGenerator,
    issued: usize,
    graded: usize,
}

struct HubInner {
    sender: Mutex<Option<mpsc::Sender<ChannelMessage>>>,
    state: Mutex<HubState>,
    max_questions: usize,
}

impl HubInner {
    fn is_open(&self) -> bool {
        self.sender.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    fn sender(&self) -> Option<mpsc::Sender<ChannelMessage>> {
        self.sender.lock().ok().and_then(|s| s.clone())
    }

    fn close(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            if sender.take().is_some() {
                info!("🔌 本地 hub 已关闭连接");
            }
        }
    }

    async fn push(&self, message: ChannelMessage) -> Result<(), ChannelError> {
        let sender = self.sender().ok_or(ChannelError::Closed)?;
        sender.send(message).await.map_err(|_| ChannelError::Closed)
    }

    /// 推送下一道题，达到出题上限时返回 false
    async fn push_question(&self) -> Result<bool, ChannelError> {
        let payload = {
            let mut state = self.state.lock().map_err(|_| ChannelError::Closed)?;
            if self.max_questions > 0 && state.issued >= self.max_questions {
                return Ok(false);
            }
            state.issued += 1;
            state.generator.next_question()
        };

        debug!("出题: {}", payload.expression);
        let message = ChannelMessage::with_payload(EventKind::NewQuestion.name(), &payload)
            .map_err(|e| ChannelError::InvalidArguments {
                method: EventKind::NewQuestion.name().to_string(),
                message: e.to_string(),
            })?;
        self.push(message).await?;
        Ok(true)
    }

    /// 推送判分回执，然后出下一题；全部题目判完后关闭连接
    async fn push_result(&self, result: ReceiveResultPayload) -> Result<(), ChannelError> {
        let message = ChannelMessage::with_payload(EventKind::ReceiveResult.name(), &result)
            .map_err(|e| ChannelError::InvalidArguments {
                method: EventKind::ReceiveResult.name().to_string(),
                message: e.to_string(),
            })?;
        self.push(message).await?;

        let all_graded = {
            let mut state = self.state.lock().map_err(|_| ChannelError::Closed)?;
            state.graded += 1;
            self.max_questions > 0 && state.graded >= self.max_questions
        };
        if all_graded {
            self.close();
            return Ok(());
        }

        self.push_question().await?;
        Ok(())
    }
}

/// `SubmitAnswer` 的参数
#[derive(Debug)]
struct Submission {
    correct_answer: f64,
    proposed_answer: f64,
    user_decision: bool,
    local_verdict: bool,
    request_id: Option<Uuid>,
}

impl Submission {
    fn parse(arguments: &[JsonValue]) -> Result<Self, ChannelError> {
        let invalid = |message: &str| ChannelError::InvalidArguments {
            method: SUBMIT_ANSWER.to_string(),
            message: message.to_string(),
        };

        if !(5..=6).contains(&arguments.len()) {
            return Err(invalid("参数个数应为 5 或 6"));
        }
        arguments[0].as_str().ok_or_else(|| invalid("playerName 应为字符串"))?;

        let request_id = match arguments.get(5) {
            Some(v) => Some(
                v.as_str()
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .ok_or_else(|| invalid("requestId 应为 UUID 字符串"))?,
            ),
            None => None,
        };

        Ok(Self {
            correct_answer: arguments[1]
                .as_f64()
                .ok_or_else(|| invalid("correctAnswer 应为数字"))?,
            proposed_answer: arguments[2]
                .as_f64()
                .ok_or_else(|| invalid("proposedAnswer 应为数字"))?,
            user_decision: arguments[3]
                .as_bool()
                .ok_or_else(|| invalid("userDecision 应为布尔值"))?,
            local_verdict: arguments[4]
                .as_bool()
                .ok_or_else(|| invalid("localVerdict 应为布尔值"))?,
            request_id,
        })
    }
}

/// 本地 hub 通道
#[derive(Clone)]
pub struct LocalHub {
    inner: Arc<HubInner>,
}

impl LocalHub {
    /// 建立连接：推送第一道题，返回通道与入站消息接收端
    pub async fn connect(
        settings: HubSettings,
    ) -> Result<(Self, mpsc::Receiver<ChannelMessage>), ChannelError> {
        let (sender, receiver) = mpsc::channel(settings.event_buffer.max(1));
        let inner = Arc::new(HubInner {
            sender: Mutex::new(Some(sender)),
            state: Mutex::new(HubState {
                generator: QuestionGenerator::new(settings.seed),
                issued: 0,
                graded: 0,
            }),
            max_questions: settings.max_questions,
        });

        inner.push_question().await?;

        if let Some(interval) = settings.question_interval {
            let ticker = Arc::clone(&inner);
            tokio::spawn(async move {
                let mut timer = tokio::time::interval(interval);
                // interval 的第一次 tick 立即完成
                timer.tick().await;
                loop {
                    timer.tick().await;
                    if !ticker.is_open() {
                        break;
                    }
                    match ticker.push_question().await {
                        Ok(true) => {}
                        Ok(false) | Err(_) => break,
                    }
                }
            });
        }

        info!("✓ 已连接到本地 hub");
        Ok((Self { inner }, receiver))
    }

    /// 主动断开连接
    pub fn disconnect(&self) {
        self.inner.close();
    }

    fn grade(&self, submission: &Submission) -> ReceiveResultPayload {
        let is_correct = submission.proposed_answer == submission.correct_answer;
        if submission.local_verdict != is_correct {
            warn!(
                "⚠️ 客户端本地判定与 hub 不一致: 本地={} hub={}",
                submission.local_verdict, is_correct
            );
        }
        ReceiveResultPayload {
            is_correct,
            user_answer: UserAnswer::from_decision(submission.user_decision),
            request_id: submission.request_id,
        }
    }
}

#[async_trait]
impl ChannelAdapter for LocalHub {
    fn is_ready(&self) -> bool {
        self.inner.is_open()
    }

    async fn invoke(&self, method: &str, arguments: Vec<JsonValue>) -> Result<(), ChannelError> {
        if method != SUBMIT_ANSWER {
            return Err(ChannelError::UnknownMethod(method.to_string()));
        }
        if !self.inner.is_open() {
            return Err(ChannelError::Closed);
        }

        let submission = Submission::parse(&arguments)?;
        let result = self.grade(&submission);

        // 回执异步送达，调用方不等待
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if let Err(e) = inner.push_result(result).await {
                error!("推送判分回执失败: {}", e);
            }
        });
        Ok(())
    }
}
