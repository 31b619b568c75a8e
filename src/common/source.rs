use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `Source` represents some literal Lox source code: whether a REPL line,
/// a file on disk, or an in-memory string handed to the interpreter
/// embedded in another program. It's essentially a string with a path, the
/// path serving as the source's name in diagnostics. Sources without a
/// real path point to `<source>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub contents: String,
    pub path: PathBuf,
}

impl Source {
    /// Builds a `Source` from a string and an explicit path.
    pub fn new(contents: &str, path: &Path) -> Source {
        Source {
            contents: contents.to_string(),
            path: path.to_owned(),
        }
    }

    /// Reads a file from disk into a `Source`.
    pub fn path(path: &Path) -> io::Result<Source> {
        let contents = fs::read_to_string(path)?;
        Ok(Source::new(&contents, path))
    }

    /// Builds a `Source` from a bare string, with no meaningful path. Used
    /// for REPL lines and embedded test snippets.
    pub fn source(contents: &str) -> Source {
        Source::new(contents, &PathBuf::from("<source>"))
    }

    /// A printable name for this source, used in diagnostics.
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn source_from_string_has_synthetic_path() {
        let source = Source::source("print 1;");
        assert_eq!(source.contents, "print 1;");
        assert_eq!(source.name(), "<source>");
    }

    #[test]
    fn source_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hello.lox");
        std::fs::write(&file, "print \"hi\";").unwrap();

        let source = Source::path(&file).unwrap();
        assert_eq!(source.contents, "print \"hi\";");
    }
}
