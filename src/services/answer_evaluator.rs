//! 答案判定服务 - 业务能力层
//!
//! 只负责"从表达式中取出提议答案并与正确答案比较"，不关心流程

use crate::config::Config;
use crate::error::GameError;

/// 数值比较规则
///
/// `Exact` 要求两个 `f64` 完全相等。表达式中的数值和通道传来的正确答案
/// 都经过正确舍入的十进制转换，出题方用十进制生成的数值可以精确比较。
/// 出题方会产生无限小数时改用 `Tolerance`。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ComparisonRule {
    #[default]
    Exact,
    Tolerance(f64),
}

impl ComparisonRule {
    pub fn from_tolerance(tolerance: Option<f64>) -> Self {
        match tolerance {
            Some(eps) if eps > 0.0 => ComparisonRule::Tolerance(eps),
            _ => ComparisonRule::Exact,
        }
    }

    pub fn matches(self, proposed: f64, correct: f64) -> bool {
        match self {
            ComparisonRule::Exact => proposed == correct,
            ComparisonRule::Tolerance(eps) => (proposed - correct).abs() <= eps,
        }
    }
}

/// 判定结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// 表达式中 `=` 右侧的提议答案
    pub proposed_answer: f64,
    /// 提议答案是否等于正确答案
    pub is_correct: bool,
}

/// 使用精确比较判定表达式
pub fn evaluate(expression: &str, correct_answer: f64) -> Result<Evaluation, GameError> {
    evaluate_with(expression, correct_answer, ComparisonRule::Exact)
}

/// 按指定比较规则判定表达式
///
/// 在第一个 `=` 处切分，右侧去掉空白后按浮点数解析
pub fn evaluate_with(
    expression: &str,
    correct_answer: f64,
    rule: ComparisonRule,
) -> Result<Evaluation, GameError> {
    let (_, tail) = expression
        .split_once('=')
        .ok_or_else(|| GameError::malformed(expression, "缺少 '='"))?;

    let tail = tail.trim();
    if tail.is_empty() {
        return Err(GameError::malformed(expression, "'=' 后没有数值"));
    }

    let proposed_answer: f64 = tail
        .parse()
        .map_err(|_| GameError::malformed(expression, "'=' 后不是数字"))?;

    if !proposed_answer.is_finite() {
        return Err(GameError::malformed(expression, "提议答案不是有限数"));
    }

    Ok(Evaluation {
        proposed_answer,
        is_correct: rule.matches(proposed_answer, correct_answer),
    })
}

/// 答案判定服务
pub struct AnswerEvaluator {
    rule: ComparisonRule,
}

impl AnswerEvaluator {
    pub fn new(rule: ComparisonRule) -> Self {
        Self { rule }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ComparisonRule::from_tolerance(config.answer_tolerance))
    }

    pub fn evaluate(&self, expression: &str, correct_answer: f64) -> Result<Evaluation, GameError> {
        evaluate_with(expression, correct_answer, self.rule)
    }
}

impl Default for AnswerEvaluator {
    fn default() -> Self {
        Self::new(ComparisonRule::Exact)
    }
}
