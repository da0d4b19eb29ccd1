//! `git-glance count`: lines-of-code statistics for a directory tree.
//!
//! Walks the tree, classifies files by suffix, honors `.gitignore` rules
//! by translating each pattern into an anchored regex, and prints a
//! per-type summary. Results are cached as JSON keyed by the md5 of the
//! counted path so the next run can show per-type line deltas.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use colored::*;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::core::dirs::get_cache_directory;
use crate::core::error::{GlanceError, Result};

/// Paths excluded regardless of any `.gitignore`: VCS internals and
/// binary media formats.
const ABSOLUTE_RULES: &[&str] = &[
    r"(^|/)\.git(/|$)",
    r"\.(xbm|tif|tiff|pjp|svgz|jpg|jpeg|ico|icns|gif|svg|jfif|webp|png|bmp|avif)$",
    r"\.(avi|rmvb|rm|asf|divx|mpg|mpeg|mpe|wmv|mp4|mkv|vob)$",
    r"\.(mp3|wma|midi?|cda|wav|ape|flac|aiff|au)$",
    r"\.(otf|woff|woff2|ttf|eot)$",
    r"\.(exe|bin|o|so|a|dylib)$",
];

/// Suffix → display type. Unknown suffixes report as themselves.
const SUFFIX_TYPES: &[(&str, &str)] = &[
    ("c", "C"),
    ("h", "C"),
    ("cpp", "C++"),
    ("hpp", "C++"),
    ("cs", "C#"),
    ("css", "CSS"),
    ("scss", "CSS"),
    ("dart", "Dart"),
    ("go", "Go"),
    ("html", "HTML"),
    ("htm", "HTML"),
    ("java", "Java"),
    ("js", "JavaScript"),
    ("jsx", "React"),
    ("tsx", "React"),
    ("ts", "TypeScript"),
    ("json", "JSON"),
    ("kt", "Kotlin"),
    ("lua", "Lua"),
    ("md", "Markdown"),
    ("markdown", "Markdown"),
    ("php", "PHP"),
    ("py", "Python"),
    ("rb", "Ruby"),
    ("rs", "Rust"),
    ("sh", "Shell"),
    ("zsh", "Shell"),
    ("swift", "Swift"),
    ("toml", "TOML"),
    ("vim", "Vim Script"),
    ("vue", "Vue"),
    ("xml", "XML"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub files: usize,
    pub lines: usize,
}

struct IgnoreRule {
    pattern: Regex,
    include: bool,
}

pub fn execute_count(path: &str, use_ignore: bool, show_invalid: bool) -> Result<()> {
    let root = fs::canonicalize(path)?;
    let (result, invalid) = count(&root, use_ignore)?;

    if result.is_empty() {
        return Err(GlanceError::NothingToCount { path: root });
    }

    let previous = load_cached(&root);
    print_result(&result, previous.as_ref());
    save_cache(&root, &result);

    if show_invalid && !invalid.is_empty() {
        println!("\n{}", "Unreadable files:".bright_black());
        for path in invalid {
            println!("  {}", path.display().to_string().bright_black());
        }
    }
    Ok(())
}

/// Walk `root` and accumulate per-type file and line counts.
fn count(root: &Path, use_ignore: bool) -> Result<(BTreeMap<String, TypeCount>, Vec<PathBuf>)> {
    let absolute: Vec<Regex> = ABSOLUTE_RULES
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("static rule")
        })
        .collect();

    let mut rules: Vec<IgnoreRule> = Vec::new();
    let mut result = BTreeMap::new();
    let mut invalid = Vec::new();
    walk(root, root, use_ignore, &absolute, &mut rules, &mut result, &mut invalid)?;
    Ok((result, invalid))
}

fn walk(
    dir: &Path,
    root: &Path,
    use_ignore: bool,
    absolute: &[Regex],
    rules: &mut Vec<IgnoreRule>,
    result: &mut BTreeMap<String, TypeCount>,
    invalid: &mut Vec<PathBuf>,
) -> Result<()> {
    // Rules from this directory's .gitignore apply to everything below it.
    if use_ignore {
        let gitignore = dir.join(".gitignore");
        if let Ok(content) = fs::read_to_string(&gitignore) {
            let scope = dir.strip_prefix(root).unwrap_or(Path::new(""));
            rules.extend(parse_gitignore(&content, &scope.to_string_lossy()));
        }
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("walk error under {}: {e}", dir.display());
            return Ok(());
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let rel = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        if !matching(&rel, absolute, rules) {
            continue;
        }

        if path.is_dir() {
            walk(&path, root, use_ignore, absolute, rules, result, invalid)?;
        } else {
            match count_file_lines(&path) {
                Some(lines) => {
                    let name = entry.file_name().to_string_lossy().to_string();
                    let entry = result.entry(adjudge_type(&name)).or_default();
                    entry.files += 1;
                    entry.lines += lines;
                }
                None => invalid.push(path),
            }
        }
    }
    Ok(())
}

/// Whether `rel_path` survives the ignore rules. Absolute rules always
/// exclude; among `.gitignore` rules the last match wins, so a later
/// negation can re-include a file.
fn matching(rel_path: &str, absolute: &[Regex], rules: &[IgnoreRule]) -> bool {
    if absolute.iter().any(|r| r.is_match(rel_path)) {
        return false;
    }
    match rules.iter().rev().find(|r| r.pattern.is_match(rel_path)) {
        Some(rule) => rule.include,
        None => true,
    }
}

/// Translate the lines of one `.gitignore` into scoped regex rules.
fn parse_gitignore(content: &str, scope: &str) -> Vec<IgnoreRule> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| translate_pattern(l, scope))
        .collect()
}

/// One gitignore pattern → an anchored regex over root-relative paths.
///
/// Glob conversion: `**` crosses directories, `*` and `?` do not; a
/// pattern without a slash matches at any depth below its scope; a
/// pattern matching a directory also matches everything inside it.
fn translate_pattern(pattern: &str, scope: &str) -> Option<IgnoreRule> {
    let include = pattern.starts_with('!');
    let pattern = pattern.trim_start_matches('!');
    let pattern = pattern.trim_end_matches('/');
    if pattern.is_empty() {
        return None;
    }

    let anchored = pattern.starts_with('/') || {
        let mut inner = pattern.chars();
        inner.next_back();
        inner.as_str().contains('/')
    };
    let pattern = pattern.trim_start_matches('/');

    let mut regex = String::from("^");
    if !scope.is_empty() {
        regex.push_str(&regex_escape_path(scope));
        regex.push('/');
    }
    if !anchored {
        // May match at any depth below the scope.
        regex.push_str("([^/]+/)*");
    }

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    regex.push_str(".*");
                } else {
                    regex.push_str("[^/]*");
                }
            }
            '?' => regex.push_str("[^/]"),
            c if "\\.+()[]{}^$|".contains(c) => {
                regex.push('\\');
                regex.push(c);
            }
            c => regex.push(c),
        }
    }
    // The pattern matches the path itself or anything beneath it.
    regex.push_str("(/.*)?$");

    match Regex::new(&regex) {
        Ok(pattern) => Some(IgnoreRule { pattern, include }),
        Err(e) => {
            log::warn!("skipping unusable ignore pattern: {e}");
            None
        }
    }
}

fn regex_escape_path(path: &str) -> String {
    regex::escape(path)
}

/// Line count for one file, or `None` for binary/unreadable content.
fn count_file_lines(path: &Path) -> Option<usize> {
    let bytes = fs::read(path).ok()?;
    if bytes.is_empty() {
        return Some(0);
    }
    if bytes.iter().take(1024).any(|&b| b == 0) {
        return None;
    }
    let mut lines = bytes.iter().filter(|&&b| b == b'\n').count();
    if *bytes.last().unwrap() != b'\n' {
        lines += 1;
    }
    Some(lines)
}

/// File type from its name: special names first, then the suffix table,
/// falling back to the raw suffix.
fn adjudge_type(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "requirements.txt" => return "Pip requirement".to_string(),
        "license" => return "LICENSE".to_string(),
        "makefile" => return "Makefile".to_string(),
        "dockerfile" => return "Dockerfile".to_string(),
        _ => {}
    }

    let suffix = name.rsplit('.').next().unwrap_or(name);
    SUFFIX_TYPES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(suffix))
        .map(|(_, t)| t.to_string())
        .unwrap_or_else(|| suffix.to_string())
}

fn print_result(result: &BTreeMap<String, TypeCount>, previous: Option<&BTreeMap<String, TypeCount>>) {
    println!("{:<20} {:>8} {:>10}", "Type".bold(), "Files".bold(), "Lines".bold());
    let mut total = TypeCount::default();
    for (kind, count) in result {
        let delta = previous
            .and_then(|prev| prev.get(kind))
            .map(|prev| count.lines as i64 - prev.lines as i64)
            .filter(|d| *d != 0)
            .map(|d| {
                if d > 0 {
                    format!(" (+{d})").green().to_string()
                } else {
                    format!(" ({d})").red().to_string()
                }
            })
            .unwrap_or_default();
        println!("{:<20} {:>8} {:>10}{delta}", kind, count.files, count.lines);
        total.files += count.files;
        total.lines += count.lines;
    }
    println!("{:<20} {:>8} {:>10}", "Total".bold(), total.files, total.lines);
}

fn cache_file(root: &Path) -> Option<PathBuf> {
    let hash = format!("{:x}", md5::compute(root.to_string_lossy().as_bytes()));
    let dir = get_cache_directory().ok()?.join("counter");
    Some(dir.join(format!("{hash}.json")))
}

fn load_cached(root: &Path) -> Option<BTreeMap<String, TypeCount>> {
    let path = cache_file(root)?;
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

fn save_cache(root: &Path, result: &BTreeMap<String, TypeCount>) {
    let Some(path) = cache_file(root) else {
        return;
    };
    let Some(parent) = path.parent() else {
        return;
    };
    if fs::create_dir_all(parent).is_err() {
        return;
    }
    if let Ok(content) = serde_json::to_string(result) {
        let _ = fs::write(path, content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str) -> IgnoreRule {
        translate_pattern(pattern, "").unwrap()
    }

    #[test]
    fn test_plain_name_matches_at_any_depth() {
        let rule = rule("target");
        assert!(rule.pattern.is_match("target"));
        assert!(rule.pattern.is_match("sub/target"));
        assert!(rule.pattern.is_match("target/debug/app.d"));
        assert!(!rule.pattern.is_match("targetx"));
    }

    #[test]
    fn test_anchored_pattern_stays_at_root() {
        let rule = rule("/build");
        assert!(rule.pattern.is_match("build"));
        assert!(rule.pattern.is_match("build/out.o"));
        assert!(!rule.pattern.is_match("sub/build"));
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let rule = rule("*.log");
        assert!(rule.pattern.is_match("app.log"));
        assert!(rule.pattern.is_match("logs/app.log"));
        let anchored = super::translate_pattern("/out/*.log", "").unwrap();
        assert!(anchored.pattern.is_match("out/a.log"));
        assert!(!anchored.pattern.is_match("out/deep/a.log"));
    }

    #[test]
    fn test_double_star_crosses_directories() {
        let rule = rule("docs/**/draft.md");
        assert!(rule.pattern.is_match("docs/a/b/draft.md"));
    }

    #[test]
    fn test_negation_reincludes() {
        let rules = vec![rule("*.log"), super::translate_pattern("!keep.log", "").unwrap()];
        assert!(!matching("app.log", &[], &rules));
        assert!(matching("keep.log", &[], &rules));
    }

    #[test]
    fn test_scoped_rule_applies_below_its_directory() {
        let rule = translate_pattern("*.tmp", "sub").unwrap();
        assert!(rule.pattern.is_match("sub/a.tmp"));
        assert!(!rule.pattern.is_match("a.tmp"));
    }

    #[test]
    fn test_absolute_rules_exclude_git_dir() {
        let absolute: Vec<Regex> = ABSOLUTE_RULES
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .unwrap()
            })
            .collect();
        assert!(!matching(".git/config", &absolute, &[]));
        assert!(!matching("assets/logo.PNG", &absolute, &[]));
        assert!(matching("src/main.rs", &absolute, &[]));
    }

    #[test]
    fn test_adjudge_type() {
        assert_eq!(adjudge_type("main.rs"), "Rust");
        assert_eq!(adjudge_type("app.PY"), "Python");
        assert_eq!(adjudge_type("LICENSE"), "LICENSE");
        assert_eq!(adjudge_type("weird.xyz"), "xyz");
    }

    #[test]
    fn test_count_file_lines() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("a.rs");
        fs::write(&text, "one\ntwo\nthree").unwrap();
        assert_eq!(count_file_lines(&text), Some(3));

        let trailing = dir.path().join("b.rs");
        fs::write(&trailing, "one\ntwo\n").unwrap();
        assert_eq!(count_file_lines(&trailing), Some(2));

        let binary = dir.path().join("c.bin");
        fs::write(&binary, [0u8, 1, 2, 3]).unwrap();
        assert_eq!(count_file_lines(&binary), None);
    }

    #[test]
    fn test_count_walk_honors_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "ignored.rs\n").unwrap();
        fs::write(dir.path().join("kept.rs"), "fn main() {}\n").unwrap();
        fs::write(dir.path().join("ignored.rs"), "fn gone() {}\n").unwrap();

        let (result, _) = count(dir.path(), true).unwrap();
        let rust = result.get("Rust").unwrap();
        assert_eq!(rust.files, 1);
        assert_eq!(rust.lines, 1);
    }
}
