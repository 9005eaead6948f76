//! Rendered code digest handling
//!
//! A digest is the concatenated source of a repository where every file is
//! introduced by a three-line header:
//!
//! ```text
//! ================================================
//! File: src/server.ts
//! ================================================
//! ```

/// Header rule line: 48 `=` characters
pub const FILE_HEADER_RULE: &str = "================================================";

/// File extensions whose bodies carry no architecture signal
pub const DEFAULT_SKIP_EXTENSIONS: &[&str] = &[".css", ".map", ".svg", ".ico", ".gltf"];

/// Whether a line opens (or closes) a file header
#[inline]
pub fn is_header_rule(line: &str) -> bool {
    line.starts_with(FILE_HEADER_RULE)
}

/// Drop the bodies of files whose path ends with a skipped extension
///
/// Header blocks are always kept so the file list stays intact.
pub fn filter_skipped_files<S: AsRef<str>>(content: &str, skip_extensions: &[S]) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut skipping = false;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if is_header_rule(line) {
            match lines.get(i + 1) {
                Some(file_line) if file_line.starts_with("File:") => {
                    skipping = skip_extensions
                        .iter()
                        .any(|ext| file_line.trim_end().ends_with(ext.as_ref()));
                    kept.push(line);
                    kept.push(file_line);
                    if let Some(closing) = lines.get(i + 2) {
                        kept.push(closing);
                    }
                    i += 3;
                    continue;
                }
                // a rule without a file line belongs to the current body
                _ => {
                    if !skipping {
                        kept.push(line);
                    }
                }
            }
        } else if !skipping {
            kept.push(line);
        }
        i += 1;
    }

    kept.join("\n")
}
