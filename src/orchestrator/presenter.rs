//! 文本展示
//!
//! 把历史记录渲染成表格，并解析用户输入的命令

use crate::models::QuestionEntry;

/// 用户输入的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 判断最新题目：true 表示等式成立
    Decide(bool),
    /// 显示历史
    List,
    /// 退出
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(Command::Decide(true)),
        "n" | "no" => Some(Command::Decide(false)),
        "l" | "list" => Some(Command::List),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

const HEADERS: [&str; 4] = ["#", "Expression", "Your Answer", "Result"];

/// 渲染历史表格
///
/// 只有最后一个未作答的题目可以作答，显示为 `[y/n]`
pub fn render_ledger(entries: &[QuestionEntry]) -> String {
    let last = entries.len().saturating_sub(1);
    let rows: Vec<[String; 4]> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let answer = match entry.user_answer {
                Some(answer) => answer.to_string(),
                None if i == last => "[y/n]".to_string(),
                None => "-".to_string(),
            };
            [
                (i + 1).to_string(),
                entry.expression.clone(),
                answer,
                entry.status().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 4]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("| {} |", padded.join(" | "))
    };
    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut out = vec![separator.clone(), format_row(HEADERS), separator.clone()];
    for row in &rows {
        out.push(format_row(row.each_ref().map(String::as_str)));
    }
    out.push(separator);
    out.join("\n")
}
