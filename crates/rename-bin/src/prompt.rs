use anyhow::Result;
use inquire::{InquireError, Select, Text};
use rename_core::{Answer, Question};
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;

/// Asks the user what to do with a pending change.
///
/// Dismissing the prompt with Esc yields `None`, which skips this one change.
/// Ctrl-C and terminal failures are returned as errors and end the run.
pub fn ask_change(question: &Question<'_>, show_diff: bool) -> Result<Option<Answer>> {
    if show_diff {
        if let Question::Contents { path, before, after, .. } = question {
            println!("\n📝 Content change: {}", path.display());
            println!("{}", render_diff(before, after)?);
        }
    }

    let message = question.message();
    match Select::new(&message, Answer::ALL.to_vec()).prompt() {
        Ok(answer) => Ok(Some(answer)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Free-text prompt. A dismissed prompt counts as an empty answer.
pub fn ask_text(message: &str, default: Option<&str>) -> Result<String> {
    let mut prompt = Text::new(message);
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }

    match prompt.prompt() {
        Ok(answer) => Ok(answer.trim().to_string()),
        Err(InquireError::OperationCanceled) => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

fn render_diff(old_content: &str, new_content: &str) -> Result<String> {
    let diff = TextDiff::from_lines(old_content, new_content);
    let mut output = String::new();

    for (i, group) in diff.grouped_ops(3).iter().enumerate() {
        if i > 0 {
            writeln!(output, "{:-^1$}", "", 40)?;
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, style) = match change.tag() {
                    ChangeTag::Delete => ("- ", "\x1b[31m"),
                    ChangeTag::Insert => ("+ ", "\x1b[32m"),
                    ChangeTag::Equal => ("  ", "\x1b[0m"),
                };
                write!(output, "{}{}{}\x1b[0m", style, sign, change.value())?;
                if change.missing_newline() {
                    writeln!(output)?;
                }
            }
        }
    }

    Ok(output)
}
