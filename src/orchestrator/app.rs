use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::presenter::{parse_command, render_ledger, Command};
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{ChannelMessage, HubSettings, LocalHub};
use crate::models::LedgerStats;
use crate::utils::logging::{log_startup, log_usage, print_final_stats};
use crate::workflow::{EventRouter, GameSession, RouteOutcome};

/// 输入结束后等待在途判分回执的最长空闲时间
const DRAIN_IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);
        Ok(Self { config })
    }

    async fn connect(&self) -> AppResult<(LocalHub, mpsc::Receiver<ChannelMessage>)> {
        let connection = LocalHub::connect(HubSettings::from_config(&self.config)).await?;
        info!("🔗 已连接 hub: {}", self.config.hub_url);
        Ok(connection)
    }

    /// 运行应用主逻辑，从标准输入读取用户判断
    pub async fn run(self) -> Result<LedgerStats> {
        self.run_with_input(BufReader::new(tokio::io::stdin())).await
    }

    /// 运行一次会话
    ///
    /// 通道事件与用户输入在同一个循环里串行处理。
    /// 通道关闭或用户退出时会话结束；输入结束后继续接收事件，
    /// 直到已作答的题目全部判分（或空闲超时）
    pub async fn run_with_input<R>(self, input: R) -> Result<LedgerStats>
    where
        R: AsyncBufRead + Unpin,
    {
        let (hub, mut events) = self.connect().await.context("连接本地 hub 失败")?;

        let mut session = GameSession::new(&self.config, Arc::new(hub.clone()));
        let router = EventRouter::new();
        let mut lines = input.lines();
        let mut input_open = true;

        log_usage();

        loop {
            tokio::select! {
                biased;

                message = events.recv() => match message {
                    Some(message) => {
                        if let RouteOutcome::Applied(_) = router.route(&mut session, &message) {
                            println!("{}", render_ledger(session.entries()));
                        }
                        if !input_open && session.ledger().last_unresolved().is_none() {
                            info!("在途回执已全部收到，会话结束");
                            break;
                        }
                    }
                    None => {
                        info!("🔌 通道已关闭，会话结束");
                        break;
                    }
                },

                line = lines.next_line(), if input_open => match line.context("读取输入失败")? {
                    Some(line) => match parse_command(&line) {
                        Some(Command::Decide(is_yes)) => {
                            match session.on_user_decision(is_yes).await {
                                Ok(()) => println!("{}", render_ledger(session.entries())),
                                Err(e) => {
                                    warn!("⚠️ {}", e);
                                    if e.is_submission_failure() {
                                        println!("{}", render_ledger(session.entries()));
                                    }
                                }
                            }
                        }
                        Some(Command::List) => println!("{}", render_ledger(session.entries())),
                        Some(Command::Quit) => {
                            info!("👋 用户退出");
                            break;
                        }
                        None => {
                            if !line.trim().is_empty() {
                                warn!("无法识别的输入: {}", line.trim());
                                log_usage();
                            }
                        }
                    },
                    None => {
                        input_open = false;
                        if session.ledger().last_unresolved().is_none() {
                            info!("输入已结束");
                            break;
                        }
                        info!("输入已结束，等待在途的判分回执");
                    }
                },

                _ = tokio::time::sleep(DRAIN_IDLE_TIMEOUT), if !input_open => {
                    warn!("⚠️ 等待判分回执超时，仍有题目未判分");
                    break;
                }
            }
        }

        hub.disconnect();

        let stats = session.ledger().stats();
        print_final_stats(&stats);
        Ok(stats)
    }
}
