//! Sysconfig file editor with array support.
//!
//! Parses the line-oriented `KEY="VALUE"` format used by /etc/sysconfig
//! files. A key with an `_{number}` suffix is treated as one element of an
//! array (`PATTERNS_0`, `PATTERNS_1`, ...). Lines that match neither rule
//! (comments, blanks, malformed lines) are kept byte-for-byte and never
//! answered by any query.
//!
//! The editor works on one in-memory document; reading and writing the
//! file itself is the caller's job.

/// What the visitor closure tells [`SysconfigEditor::scan`] to do with the
/// line it was just shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanVerdict {
    /// Stop scanning.
    Stop,
    /// Keep scanning.
    Continue,
    /// Delete this line, then stop.
    DeleteStop,
    /// Delete this line, then keep scanning.
    DeleteContinue,
    /// Rewrite this line's value in normalized quoted form, then stop.
    SetValue(String),
}

/// In-memory sysconfig document.
///
/// All operations are single left-to-right passes over the lines; the
/// scan primitive defers deletions until the pass is over and removes
/// from the end backwards so indices collected earlier stay valid.
#[derive(Debug, Clone)]
pub struct SysconfigEditor {
    lines: Vec<String>,
}

impl SysconfigEditor {
    /// Parse a document from raw text. A trailing newline does not
    /// introduce an extra empty line.
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        Self { lines }
    }

    /// Distinct logical key names in first-occurrence order. An array key
    /// appears once, not once per index.
    pub fn keys(&self) -> Vec<String> {
        let mut ret: Vec<String> = Vec::new();
        for (key, _, _) in self.parsed() {
            if !ret.iter().any(|k| k == key) {
                ret.push(key.to_string());
            }
        }
        ret
    }

    /// Scalar value for `key`, or an empty string if the key is absent.
    /// Asking for an array key also yields an empty string.
    pub fn get(&self, key: &str) -> String {
        self.parsed()
            .find(|(k, idx, _)| *k == key && idx.is_none())
            .map(|(_, _, v)| v.to_string())
            .unwrap_or_default()
    }

    /// Update the scalar value in place, or append a new line if the key
    /// does not exist yet. Returns true only if an existing entry was
    /// overwritten.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let mut found = false;
        self.scan(
            |k| k == key,
            |_, idx, _| {
                if idx.is_none() {
                    found = true;
                    ScanVerdict::SetValue(value.to_string())
                } else {
                    ScanVerdict::Continue
                }
            },
        );
        if !found {
            self.lines.push(format!("{key}=\"{value}\""));
        }
        found
    }

    /// Length of the array `key`: highest index present plus one, or 0 if
    /// no indexed entries exist. Gaps between indices are tolerated.
    pub fn array_len(&self, key: &str) -> usize {
        self.parsed()
            .filter(|(k, idx, _)| *k == key && idx.is_some())
            .filter_map(|(_, idx, _)| idx)
            .map(|i| i + 1)
            .max()
            .unwrap_or(0)
    }

    /// Value at `key`/`index`, or an empty string if that element is
    /// absent.
    pub fn array_get(&self, key: &str, index: usize) -> String {
        self.parsed()
            .find(|(k, idx, _)| *k == key && *idx == Some(index))
            .map(|(_, _, v)| v.to_string())
            .unwrap_or_default()
    }

    /// Update the element in place, or append a new indexed line if it
    /// does not exist yet. Returns true only if an existing element was
    /// overwritten.
    pub fn array_set(&mut self, key: &str, index: usize, value: &str) -> bool {
        let mut found = false;
        self.scan(
            |k| k == key,
            |_, idx, _| {
                if idx == Some(index) {
                    found = true;
                    ScanVerdict::SetValue(value.to_string())
                } else {
                    ScanVerdict::Continue
                }
            },
        );
        if !found {
            self.lines.push(format!("{key}_{index}=\"{value}\""));
        }
        found
    }

    /// Shrink or grow the array to exactly `new_len` elements. Elements
    /// with an index at or beyond `new_len` are deleted; missing indices
    /// above the highest survivor are appended with empty values. A
    /// `new_len` of 0 erases the array.
    pub fn array_resize(&mut self, key: &str, new_len: usize) {
        let mut max_surviving: Option<usize> = None;
        self.scan(
            |k| k == key,
            |_, idx, _| match idx {
                None => ScanVerdict::Continue,
                Some(i) if i >= new_len => ScanVerdict::DeleteContinue,
                Some(i) => {
                    if max_surviving.map_or(true, |m| i > m) {
                        max_surviving = Some(i);
                    }
                    ScanVerdict::Continue
                }
            },
        );
        let first_missing = max_surviving.map_or(0, |m| m + 1);
        for idx in first_missing..new_len {
            self.lines.push(format!("{key}_{idx}=\"\""));
        }
    }

    /// Serialize the document, one line per entry, with a trailing
    /// newline.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Snapshot of every parsed entry as `(key, index, value)` in
    /// document order. Inert lines are skipped.
    pub fn entries(&self) -> Vec<(String, Option<usize>, String)> {
        self.parsed()
            .map(|(k, idx, v)| (k.to_string(), idx, v.to_string()))
            .collect()
    }

    /// The scanning primitive every mutation is built from.
    ///
    /// Walks the lines once, in order. For each line that parses and whose
    /// key name satisfies `matches`, calls `visit` with the bare key name,
    /// the array index (`None` for scalar entries) and the value, then
    /// acts on the returned [`ScanVerdict`]. Deletions are applied after
    /// the pass, from the highest line index down.
    pub fn scan<M, F>(&mut self, mut matches: M, mut visit: F)
    where
        M: FnMut(&str) -> bool,
        F: FnMut(&str, Option<usize>, &str) -> ScanVerdict,
    {
        let mut to_delete: Vec<usize> = Vec::new();
        let mut rewrite: Option<(usize, String)> = None;

        for i in 0..self.lines.len() {
            let Some((key, idx, value)) = parse_line(&self.lines[i]) else {
                continue;
            };
            if !matches(key) {
                continue;
            }
            match visit(key, idx, value) {
                ScanVerdict::Stop => break,
                ScanVerdict::Continue => {}
                ScanVerdict::DeleteStop => {
                    to_delete.push(i);
                    break;
                }
                ScanVerdict::DeleteContinue => to_delete.push(i),
                ScanVerdict::SetValue(new_value) => {
                    rewrite = Some((i, format_entry(key, idx, &new_value)));
                    break;
                }
            }
        }

        if let Some((i, line)) = rewrite {
            self.lines[i] = line;
        }
        for i in to_delete.into_iter().rev() {
            self.lines.remove(i);
        }
    }

    fn parsed(&self) -> impl Iterator<Item = (&str, Option<usize>, &str)> + '_ {
        self.lines.iter().filter_map(|line| parse_line(line))
    }
}

/// Normalized form written back for updated entries.
fn format_entry(key: &str, index: Option<usize>, value: &str) -> String {
    match index {
        Some(i) => format!("{key}_{i}=\"{value}\""),
        None => format!("{key}=\"{value}\""),
    }
}

/// Parse one line into `(key, index, value)`.
///
/// Key names are `[A-Za-z0-9_]+`. A name whose last underscore is
/// followed only by digits is an array element; the digits are the index.
/// Values may be bare or double-quoted; the quotes are stripped. A value
/// with an embedded quote character does not parse (the line stays
/// inert).
fn parse_line(line: &str) -> Option<(&str, Option<usize>, &str)> {
    let line = line.trim();
    let eq = line.find('=')?;
    let name = &line[..eq];
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }
    let value = unquote(&line[eq + 1..])?;
    match split_array_name(name) {
        Some((key, index)) => Some((key, Some(index), value)),
        None => Some((name, None, value)),
    }
}

/// Strip one pair of surrounding double quotes, if present.
fn unquote(raw: &str) -> Option<&str> {
    if let Some(inner) = raw.strip_prefix('"') {
        let inner = inner.strip_suffix('"')?;
        if inner.contains('"') {
            return None;
        }
        Some(inner)
    } else if raw.contains('"') {
        None
    } else {
        Some(raw)
    }
}

/// Split `KEY_7` into `("KEY", 7)`. Returns None for plain scalar names,
/// including names like `_7` (empty stem) or `KEY_` (no digits).
fn split_array_name(name: &str) -> Option<(&str, usize)> {
    let pos = name.rfind('_')?;
    let (key, digits) = (&name[..pos], &name[pos + 1..]);
    if key.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((key, digits.parse().ok()?))
}
