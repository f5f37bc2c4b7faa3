//! Word-boundary keyword matching over text node content.
use regex::Regex;

/// Compile the match rule for a keyword: case-insensitive, whole-word,
/// Unicode-aware. The keyword is matched literally; regex metacharacters
/// in it are escaped.
pub(crate) fn keyword_pattern(keyword: &str) -> Result<Regex, regex::Error> {
  Regex::new(&format!(r"(?i)\b({})\b", regex::escape(keyword)))
}

/// Split `content` at the first match of `pattern` into
/// `(before, matched, after)`.
///
/// `matched` is the substring exactly as it appears in `content`, original
/// casing included. Returns `None` when the pattern does not match, or
/// when the capture group is missing and the three-way split cannot be
/// formed.
pub(crate) fn split_first_match<'a>(
  content: &'a str,
  pattern: &Regex,
) -> Option<(&'a str, &'a str, &'a str)> {
  let captures = pattern.captures(content)?;
  let matched = captures.get(1)?;
  Some((
    &content[..matched.start()],
    matched.as_str(),
    &content[matched.end()..],
  ))
}
