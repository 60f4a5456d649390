use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// How a single inclusion pattern is resolved against the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternScope {
    Literal(PathBuf),
    Recursive { dir: PathBuf, glob: String },
    Flat { dir: PathBuf, glob: String },
}

impl PatternScope {
    pub fn parse(pattern: &str, base_dir: &Path) -> Self {
        if !has_wildcard(pattern) {
            return PatternScope::Literal(join_relative(base_dir, pattern));
        }

        // `**/` or `**\` searches the whole tree
        if let Some(glob) = pattern
            .strip_prefix("**/")
            .or_else(|| pattern.strip_prefix("**\\"))
        {
            return PatternScope::Recursive {
                dir: base_dir.to_path_buf(),
                glob: glob.to_string(),
            };
        }

        // Split at the last separator: directory on the left, glob on the right
        match pattern.rfind(['/', '\\']) {
            Some(pos) => PatternScope::Flat {
                dir: join_relative(base_dir, &pattern[..pos]),
                glob: pattern[pos + 1..].to_string(),
            },
            None => PatternScope::Flat {
                dir: base_dir.to_path_buf(),
                glob: pattern.to_string(),
            },
        }
    }
}

/// Expands one inclusion pattern into the files it names.
///
/// A pattern without wildcards is a literal path under `base_dir`, kept only
/// if it is a regular file. `**/glob` searches every directory below
/// `base_dir`; `dir/glob` searches `base_dir/dir` only; a bare `glob`
/// searches `base_dir` only. Missing files and missing search directories
/// yield nothing. Results come back in filesystem enumeration order.
pub fn expand(pattern: &str, base_dir: &Path) -> Vec<PathBuf> {
    match PatternScope::parse(pattern, base_dir) {
        PatternScope::Literal(path) => {
            if path.is_file() {
                vec![path]
            } else {
                log::debug!("Skipping missing source file: {}", path.display());
                Vec::new()
            }
        }
        PatternScope::Recursive { dir, glob } => {
            let Some(matcher) = glob_to_regex(&glob) else {
                return Vec::new();
            };
            if !dir.is_dir() {
                return Vec::new();
            }

            // Symlinked files and directories count like the real thing
            WalkDir::new(&dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .filter(|entry| matcher.is_match(&entry.file_name().to_string_lossy()))
                .map(|entry| entry.into_path())
                .collect()
        }
        PatternScope::Flat { dir, glob } => {
            let Some(matcher) = glob_to_regex(&glob) else {
                return Vec::new();
            };
            let Ok(entries) = std::fs::read_dir(&dir) else {
                log::debug!("Search directory not found: {}", dir.display());
                return Vec::new();
            };

            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .filter(|entry| matcher.is_match(&entry.file_name().to_string_lossy()))
                .map(|entry| entry.path())
                .collect()
        }
    }
}

/// Joins a relative path that may use either slash or backslash separators.
fn join_relative(base_dir: &Path, relative: &str) -> PathBuf {
    if Path::new(relative).is_absolute() {
        return PathBuf::from(relative);
    }

    relative
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .fold(base_dir.to_path_buf(), |path, part| path.join(part))
}

pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// Compiles a filename glob (`*` and `?`) into an anchored regex.
pub fn glob_to_regex(glob: &str) -> Option<Regex> {
    let mut source = String::with_capacity(glob.len() + 8);
    source.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push('$');

    RegexBuilder::new(&source)
        .case_insensitive(cfg!(windows))
        .build()
        .map_err(|e| log::warn!("Invalid file pattern '{}': {}", glob, e))
        .ok()
}
