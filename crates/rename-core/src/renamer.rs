use std::path::{Path, PathBuf};
use regex::bytes::{NoExpand as BytesNoExpand, Regex as BytesRegex};
use regex::{NoExpand, Regex};
use tracing::debug;

/// Literal old-name to new-name substitution for file contents and basenames.
///
/// The old name is escaped before it is compiled, so names such as `my.pkg`
/// or `c++` only ever match themselves. The new name is inserted verbatim.
/// Contents are matched as raw bytes, so bytes that are not valid UTF-8 are
/// written back unchanged.
pub struct NameReplacer {
    old_name: String,
    new_name: String,
    pattern: Regex,
    content_pattern: BytesRegex,
}

impl NameReplacer {
    pub fn new(old_name: &str, new_name: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(old_name);
        Ok(Self {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            pattern: Regex::new(&escaped)?,
            content_pattern: BytesRegex::new(&escaped)?,
        })
    }

    pub fn old_name(&self) -> &str {
        &self.old_name
    }

    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    /// Replaces every occurrence of the old name, or returns `None` when the
    /// content does not mention it at all.
    pub fn process_content(&self, content: &[u8]) -> Option<Vec<u8>> {
        if !self.content_pattern.is_match(content) {
            return None;
        }
        let new_content = self
            .content_pattern
            .replace_all(content, BytesNoExpand(self.new_name.as_bytes()));
        debug!(
            "Content replacement: found {} occurrences",
            self.content_pattern.find_iter(content).count()
        );
        Some(new_content.into_owned())
    }

    /// Computes the renamed path of `path`, touching only its basename.
    ///
    /// Only the first occurrence inside the basename is replaced. Parent
    /// directories keep their names even when they contain the old name.
    pub fn process_file_name(&self, path: &Path) -> Option<PathBuf> {
        let file_name = path.file_name()?.to_str()?;
        let new_file_name = self
            .pattern
            .replace(file_name, NoExpand(self.new_name.as_str()));
        if new_file_name == file_name {
            return None;
        }
        debug!("File name replacement: '{}' -> '{}'", file_name, new_file_name);
        Some(path.with_file_name(new_file_name.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_replacement() {
        let replacer = NameReplacer::new("example-name", "acme-widgets").unwrap();

        let content = b"This is an example-name project with example-name references.";
        let result = replacer.process_content(content);

        assert_eq!(
            result.unwrap(),
            b"This is an acme-widgets project with acme-widgets references."
        );
    }

    #[test]
    fn test_no_content_replacement() {
        let replacer = NameReplacer::new("example-name", "acme-widgets").unwrap();

        let content = b"This is a test project with no matching tokens.";

        assert!(replacer.process_content(content).is_none());
    }

    #[test]
    fn test_old_name_is_matched_literally() {
        let replacer = NameReplacer::new("my.pkg", "other").unwrap();

        let result = replacer.process_content(b"myxpkg my.pkg my.pkg.sub").unwrap();

        assert_eq!(result, b"myxpkg other other.sub");
    }

    #[test]
    fn test_new_name_is_inserted_verbatim() {
        let replacer = NameReplacer::new("foo", "$1bar").unwrap();

        let result = replacer.process_content(b"foo and foo").unwrap();

        assert_eq!(result, b"$1bar and $1bar");
    }

    #[test]
    fn test_non_overlapping_occurrences() {
        let replacer = NameReplacer::new("aa", "b").unwrap();

        assert_eq!(replacer.process_content(b"aaaaa").unwrap(), b"bba");
    }

    #[test]
    fn test_invalid_utf8_bytes_survive_replacement() {
        let replacer = NameReplacer::new("foo", "bar").unwrap();

        let content = b"\xff\xfe foo \x80 foo\x00";
        let result = replacer.process_content(content).unwrap();

        assert_eq!(result, b"\xff\xfe bar \x80 bar\x00");
    }

    #[test]
    fn test_file_name_replacement() {
        let replacer = NameReplacer::new("example-name", "acme").unwrap();

        let path = Path::new("/some/path/example-name-file.txt");
        let result = replacer.process_file_name(path);

        assert_eq!(result.unwrap(), PathBuf::from("/some/path/acme-file.txt"));
    }

    #[test]
    fn test_file_name_leaves_parent_directories_alone() {
        let replacer = NameReplacer::new("oldName", "X").unwrap();

        let path = Path::new("/a/oldName/oldNameFile.txt");
        let result = replacer.process_file_name(path);

        assert_eq!(result.unwrap(), PathBuf::from("/a/oldName/XFile.txt"));
    }

    #[test]
    fn test_file_name_replaces_first_occurrence_only() {
        let replacer = NameReplacer::new("foo", "bar").unwrap();

        let result = replacer.process_file_name(Path::new("src/foo_foo.rs"));

        assert_eq!(result.unwrap(), PathBuf::from("src/bar_foo.rs"));
    }

    #[test]
    fn test_no_file_name_replacement() {
        let replacer = NameReplacer::new("example-name", "acme").unwrap();

        let path = Path::new("/some/example-name/other-file.txt");

        assert!(replacer.process_file_name(path).is_none());
    }
}
