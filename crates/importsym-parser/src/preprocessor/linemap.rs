//! Line markers in preprocessor output
//!
//! `cpp` announces where each stretch of its output came from with lines
//! such as `# 12 "pj/types.h" 1`. The markers are blanked before parsing so
//! row numbers stay stable, and kept as a map from output row to header line.

use regex::Regex;
use std::sync::OnceLock;

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^#\s*(?:line\s+)?(\d+)(?:\s+"((?:[^"\\]|\\.)*)")?"#).unwrap()
    })
}

/// Maps rows of preprocessed output back to header lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMap {
    files: Vec<String>,
    /// Per output row: index into `files` and 1-based line
    rows: Vec<Option<(usize, u32)>>,
}

impl LineMap {
    /// Blank out the line markers in `output` and record where every other
    /// line came from
    pub fn strip(output: &str) -> (String, Self) {
        let mut map = LineMap::default();
        let mut code = String::with_capacity(output.len());
        let mut current: Option<(usize, u32)> = None;

        for line in output.lines() {
            if let Some((number, file)) = parse_marker(line) {
                let file_idx = match file {
                    Some(file) => map.intern(file),
                    None => match current {
                        Some((idx, _)) => idx,
                        None => map.intern("<stdin>".to_string()),
                    },
                };
                current = Some((file_idx, number));
                map.rows.push(None);
                code.push('\n');
                continue;
            }

            map.rows.push(current);
            if let Some((_, line_no)) = current.as_mut() {
                *line_no += 1;
            }
            code.push_str(line);
            code.push('\n');
        }

        (code, map)
    }

    /// Header and line for a 0-based output row
    pub fn origin(&self, row: usize) -> Option<(&str, u32)> {
        let (file_idx, line) = (*self.rows.get(row)?)?;
        Some((self.files[file_idx].as_str(), line))
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn intern(&mut self, file: String) -> usize {
        match self.files.iter().position(|f| *f == file) {
            Some(idx) => idx,
            None => {
                self.files.push(file);
                self.files.len() - 1
            }
        }
    }
}

fn parse_marker(line: &str) -> Option<(u32, Option<String>)> {
    let caps = marker_pattern().captures(line)?;
    let number = caps.get(1)?.as_str().parse().ok()?;
    let file = caps.get(2).map(|m| unescape(m.as_str()));
    Some((number, file))
}

fn unescape(quoted: &str) -> String {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}
