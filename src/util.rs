//! Small utility helpers used across modules.

use chrono::{NaiveDate, Utc};

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Today's date (UTC) as `YYYY-MM-DD`. Day granularity keeps daily picks stable
/// across repeated calls within the same day.
pub fn today_iso() -> String {
  Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// True if `s` is a real calendar date in `YYYY-MM-DD` form.
pub fn is_iso_date(s: &str) -> bool {
  s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Split a comma-separated query value into trimmed, non-empty items.
pub fn split_csv(raw: Option<&str>) -> Vec<String> {
  raw.map(|s| {
    s.split(',')
      .map(str::trim)
      .filter(|p| !p.is_empty())
      .map(str::to_string)
      .collect()
  })
  .unwrap_or_default()
}

/// Log-safe truncation for large strings (char-boundary aware).
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) { end -= 1; }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn template_replaces_all_keys() {
    let out = fill_template("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and y and x");
  }

  #[test]
  fn iso_dates() {
    assert!(is_iso_date("2024-02-29"));
    assert!(!is_iso_date("2023-02-29"));
    assert!(!is_iso_date("2024-3-1"));
    assert!(is_iso_date(&today_iso()));
  }

  #[test]
  fn csv_splitting_drops_blanks() {
    assert_eq!(split_csv(Some(" js, ,py,")), vec!["js".to_string(), "py".to_string()]);
    assert!(split_csv(None).is_empty());
    assert!(split_csv(Some("")).is_empty());
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    let s = "héllo wörld";
    let t = trunc_for_log(s, 2);
    assert!(t.starts_with('h'));
    assert!(t.ends_with("bytes total)"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }
}
