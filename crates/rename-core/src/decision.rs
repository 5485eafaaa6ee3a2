use anyhow::Result;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Per-kind batch state. `ApplyAll` and `SkipAll` are absorbing: once a flag
/// leaves `Ask` it stays put for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    #[default]
    Ask,
    ApplyAll,
    SkipAll,
}

/// The four answers offered for every pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    YesToAll,
    NoToAll,
}

impl Answer {
    pub const ALL: [Answer; 4] = [Answer::Yes, Answer::No, Answer::YesToAll, Answer::NoToAll];
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
            Answer::YesToAll => "Yes to all",
            Answer::NoToAll => "No to all",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Contents,
    FileName,
}

/// A single change awaiting the user's verdict. Paths are relative to the
/// project root.
#[derive(Debug)]
pub enum Question<'a> {
    Contents {
        path: &'a Path,
        old_name: &'a str,
        new_name: &'a str,
        before: &'a str,
        after: &'a str,
    },
    FileName {
        from: &'a Path,
        to: &'a Path,
    },
}

impl Question<'_> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Question::Contents { .. } => ChangeKind::Contents,
            Question::FileName { .. } => ChangeKind::FileName,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Question::Contents { path, old_name, new_name, .. } => {
                format!("Replace {} with {} in {}?", old_name, new_name, path.display())
            }
            Question::FileName { from, to } => {
                format!("Rename {} to {}?", from.display(), to.display())
            }
        }
    }
}

/// Turns the user's answers into allow/deny outcomes, prompting only while
/// the flag for the question's kind is still `Ask`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionGate {
    contents: Decision,
    file_names: Decision,
}

impl DecisionGate {
    pub fn new(contents: Decision, file_names: Decision) -> Self {
        Self { contents, file_names }
    }

    pub fn decision(&self, kind: ChangeKind) -> Decision {
        match kind {
            ChangeKind::Contents => self.contents,
            ChangeKind::FileName => self.file_names,
        }
    }

    /// Resolves `question` to `true` (apply) or `false` (skip).
    ///
    /// A `None` answer from `prompt` (the prompt was dismissed) skips this
    /// change only and leaves the flag at `Ask`. Errors from `prompt` are
    /// returned untouched.
    pub fn resolve<P>(&mut self, question: &Question<'_>, prompt: &mut P) -> Result<bool>
    where
        P: FnMut(&Question<'_>) -> Result<Option<Answer>>,
    {
        let kind = question.kind();
        let decision = match kind {
            ChangeKind::Contents => &mut self.contents,
            ChangeKind::FileName => &mut self.file_names,
        };

        match *decision {
            Decision::ApplyAll => Ok(true),
            Decision::SkipAll => Ok(false),
            Decision::Ask => match prompt(question)? {
                Some(Answer::Yes) => Ok(true),
                Some(Answer::No) => Ok(false),
                Some(Answer::YesToAll) => {
                    *decision = Decision::ApplyAll;
                    match kind {
                        ChangeKind::Contents => println!("  - Rewriting all file contents"),
                        ChangeKind::FileName => println!("  - Rewriting all file names"),
                    }
                    Ok(true)
                }
                Some(Answer::NoToAll) => {
                    *decision = Decision::SkipAll;
                    Ok(false)
                }
                None => {
                    debug!("No answer for {:?} change, skipping it", kind);
                    Ok(false)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rename_question() -> Question<'static> {
        Question::FileName {
            from: Path::new("src/foo.rs"),
            to: Path::new("src/bar.rs"),
        }
    }

    fn contents_question() -> Question<'static> {
        Question::Contents {
            path: Path::new("README.md"),
            old_name: "foo",
            new_name: "bar",
            before: "foo",
            after: "bar",
        }
    }

    #[test]
    fn test_apply_all_never_prompts() {
        let mut gate = DecisionGate::new(Decision::ApplyAll, Decision::ApplyAll);
        let mut prompt = |_: &Question<'_>| -> Result<Option<Answer>> {
            panic!("prompt must not be shown")
        };

        assert!(gate.resolve(&contents_question(), &mut prompt).unwrap());
        assert!(gate.resolve(&rename_question(), &mut prompt).unwrap());
    }

    #[test]
    fn test_skip_all_never_prompts() {
        let mut gate = DecisionGate::new(Decision::SkipAll, Decision::SkipAll);
        let mut prompt = |_: &Question<'_>| -> Result<Option<Answer>> {
            panic!("prompt must not be shown")
        };

        assert!(!gate.resolve(&contents_question(), &mut prompt).unwrap());
        assert!(!gate.resolve(&rename_question(), &mut prompt).unwrap());
    }

    #[test]
    fn test_single_answers_keep_asking() {
        let mut gate = DecisionGate::default();
        let mut answers = vec![Answer::Yes, Answer::No].into_iter();
        let mut prompt = |_: &Question<'_>| Ok(answers.next());

        assert!(gate.resolve(&contents_question(), &mut prompt).unwrap());
        assert_eq!(gate.decision(ChangeKind::Contents), Decision::Ask);
        assert!(!gate.resolve(&contents_question(), &mut prompt).unwrap());
        assert_eq!(gate.decision(ChangeKind::Contents), Decision::Ask);
    }

    #[test]
    fn test_yes_to_all_is_sticky() {
        let mut gate = DecisionGate::default();
        let mut calls = 0;
        let mut prompt = |_: &Question<'_>| {
            calls += 1;
            Ok(Some(Answer::YesToAll))
        };

        for _ in 0..5 {
            assert!(gate.resolve(&contents_question(), &mut prompt).unwrap());
        }

        assert_eq!(calls, 1);
        assert_eq!(gate.decision(ChangeKind::Contents), Decision::ApplyAll);
    }

    #[test]
    fn test_no_to_all_is_sticky() {
        let mut gate = DecisionGate::default();
        let mut calls = 0;
        let mut prompt = |_: &Question<'_>| {
            calls += 1;
            Ok(Some(Answer::NoToAll))
        };

        for _ in 0..5 {
            assert!(!gate.resolve(&rename_question(), &mut prompt).unwrap());
        }

        assert_eq!(calls, 1);
        assert_eq!(gate.decision(ChangeKind::FileName), Decision::SkipAll);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut gate = DecisionGate::default();
        let mut prompt = |question: &Question<'_>| match question.kind() {
            ChangeKind::Contents => Ok(Some(Answer::NoToAll)),
            ChangeKind::FileName => Ok(Some(Answer::YesToAll)),
        };

        assert!(!gate.resolve(&contents_question(), &mut prompt).unwrap());
        assert!(gate.resolve(&rename_question(), &mut prompt).unwrap());

        assert_eq!(gate.decision(ChangeKind::Contents), Decision::SkipAll);
        assert_eq!(gate.decision(ChangeKind::FileName), Decision::ApplyAll);
    }

    #[test]
    fn test_missing_answer_skips_without_changing_flag() {
        let mut gate = DecisionGate::default();
        let mut prompt = |_: &Question<'_>| Ok(None);

        assert!(!gate.resolve(&rename_question(), &mut prompt).unwrap());
        assert_eq!(gate.decision(ChangeKind::FileName), Decision::Ask);
    }

    #[test]
    fn test_prompt_errors_propagate() {
        let mut gate = DecisionGate::default();
        let mut prompt =
            |_: &Question<'_>| -> Result<Option<Answer>> { anyhow::bail!("terminal closed") };

        let err = gate.resolve(&contents_question(), &mut prompt).unwrap_err();

        assert!(err.to_string().contains("terminal closed"));
        assert_eq!(gate.decision(ChangeKind::Contents), Decision::Ask);
    }

    #[test]
    fn test_question_messages() {
        assert_eq!(contents_question().message(), "Replace foo with bar in README.md?");
        assert_eq!(rename_question().message(), "Rename src/foo.rs to src/bar.rs?");
    }
}
