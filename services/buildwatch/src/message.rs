//! Status message formatting for the chat webhook

use crate::record::{BuildRecord, BuildStatus};

/// Font color class used by the WeCom markdown renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Green, low emphasis
    Info,
    /// Orange, high emphasis
    Warning,
    /// Grey, neutral
    Comment,
}

impl Emphasis {
    pub fn color(&self) -> &'static str {
        match self {
            Emphasis::Info => "info",
            Emphasis::Warning => "warning",
            Emphasis::Comment => "comment",
        }
    }
}

/// How a build status is shown to the team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub icon: &'static str,
    pub label: String,
    pub emphasis: Emphasis,
}

/// Formatted notification text and whether it ends monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_terminal: bool,
}

pub fn presentation(record: &BuildRecord) -> Presentation {
    match &record.status {
        BuildStatus::Completed if record.conclusion.as_deref() == Some("success") => Presentation {
            icon: "✅",
            label: "构建成功".to_string(),
            emphasis: Emphasis::Info,
        },
        BuildStatus::Completed => Presentation {
            icon: "❌",
            label: format!("构建失败 ({})", record.conclusion.as_deref().unwrap_or("")),
            emphasis: Emphasis::Warning,
        },
        BuildStatus::InProgress => Presentation {
            icon: "🔄",
            label: "构建中...".to_string(),
            emphasis: Emphasis::Comment,
        },
        other => Presentation {
            icon: "⏳",
            label: other.to_string(),
            emphasis: Emphasis::Comment,
        },
    }
}

/// Render the markdown notification for `record`
pub fn format_message(project_name: &str, record: &BuildRecord) -> StatusMessage {
    let Presentation {
        icon,
        label,
        emphasis,
    } = presentation(record);

    let text = format!(
        "**{project_name} 构建状态**\n\
         > {icon} <font color=\"{color}\">{label}</font>\n\
         >\n\
         > **提交:** {title}\n\
         > **分支:** {branch}\n\
         > **时间:** {updated_at}",
        color = emphasis.color(),
        title = record.title,
        branch = record.branch,
        updated_at = record.updated_at,
    );

    StatusMessage {
        text,
        is_terminal: record.status.is_terminal(),
    }
}
