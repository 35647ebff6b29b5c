//! Hint generation behind `POST /api/v1/hint`.
//!
//! The model is tried first when configured; any failure (or no model) falls back to
//! local heuristics keyed on the error message, then on the language.

use tracing::{error, info, instrument};

use crate::openai::HintPrompt;
use crate::protocol::HintRequest;
use crate::state::AppState;

/// Lines of context kept on each side of the cursor.
const WINDOW_RADIUS: usize = 8;

#[instrument(level = "info", skip(state, req), fields(language = %req.language, code_len = req.code.len(), cursor_line = ?req.cursor_line))]
pub async fn get_hint_text(state: &AppState, req: &HintRequest) -> String {
  let error_message = req.error_message.as_deref().unwrap_or("").trim();

  if let Some(oa) = &state.openai {
    let code = code_window(&req.code, req.cursor_line, WINDOW_RADIUS);
    let prompt = HintPrompt {
      language: &req.language,
      code: &code,
      error_message,
      cursor_line: req.cursor_line,
    };
    match oa.coding_hint(&state.prompts, prompt).await {
      Ok(t) if !t.is_empty() => return t,
      Ok(_) => error!(target: "hints", "Model returned an empty hint; using local hint."),
      Err(e) => error!(target: "hints", error = %e, "Model hint failed; using local hint."),
    }
  }

  let hint = local_hint(&req.language, &req.code, error_message);
  info!(target: "hints", hint_len = hint.len(), "Local hint served");
  hint
}

/// Number the lines of `code` and, when a cursor line is given, keep only
/// `radius` lines around it (1-based, clamped to the code).
pub fn code_window(code: &str, cursor_line: Option<u32>, radius: usize) -> String {
  let lines: Vec<&str> = code.lines().collect();
  if lines.is_empty() {
    return String::new();
  }
  let (start, end) = match cursor_line {
    Some(line) => {
      let cursor = (line.max(1) as usize).min(lines.len()) - 1;
      (cursor.saturating_sub(radius), (cursor + radius + 1).min(lines.len()))
    }
    None => (0, lines.len()),
  };
  lines[start..end]
    .iter()
    .enumerate()
    .map(|(i, l)| format!("{:>4} | {}", start + i + 1, l))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Heuristic hint from common error shapes; never reveals a solution.
pub fn local_hint(language: &str, code: &str, error_message: &str) -> String {
  let err = error_message.to_lowercase();

  if !err.is_empty() {
    if err.contains("is not defined") || err.contains("nameerror") || err.contains("cannot find value") {
      return "A name is used before it exists. Check the spelling and that it is declared (and in scope) before this line.".into();
    }
    if err.contains("syntaxerror") || err.contains("unexpected token") || err.contains("invalid syntax") || err.contains("expected") {
      return "The parser got confused near the reported line. Look for a missing bracket, quote, comma or colon just before it.".into();
    }
    if err.contains("indentationerror") || err.contains("unexpected indent") {
      return "Indentation must be consistent inside a block. Align this line with its neighbours and avoid mixing tabs and spaces.".into();
    }
    if err.contains("typeerror") && (err.contains("undefined") || err.contains("null") || err.contains("nonetype")) {
      return "Something you read a property from is empty at that moment. Log the value just before the failing line to see where it comes from.".into();
    }
    if err.contains("is not a function") || err.contains("not callable") {
      return "You are calling something that is not a function. Check what that name actually holds at this point.".into();
    }
    if err.contains("index") && (err.contains("out of range") || err.contains("out of bounds")) {
      return "An index goes past the end of a list. Remember the last valid index is length - 1.".into();
    }
    if err.contains("keyerror") {
      return "That key is not in the dictionary yet. Check it first, or use .get() with a default.".into();
    }
    if err.contains("maximum call stack") || err.contains("recursionerror") {
      return "The recursion never stops. Make sure there is a base case that returns without calling itself again.".into();
    }
    return "Read the error message from the bottom up: the last line names the problem, the line number tells you where to look.".into();
  }

  let lang = language.to_lowercase();
  let trimmed = code.trim();
  if trimmed.is_empty() {
    return "Start small: write the function signature first, then return a hard-coded value and improve from there.".into();
  }
  if trimmed.contains("your code here") || trimmed.ends_with("pass") {
    return "Replace the placeholder with the simplest case first (empty input), then handle one element, then many.".into();
  }
  match lang.as_str() {
    "javascript" | "js" | "typescript" | "ts" if !trimmed.contains("return") => {
      "Your function does not return anything yet. Without `return`, the caller receives undefined.".into()
    }
    "python" | "py" if !trimmed.contains("return") && trimmed.contains("def ") => {
      "Your function does not return anything yet. Without `return`, Python gives back None.".into()
    }
    _ => "Try running your code on the smallest input you can think of and compare the result with what you expect.".into(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;
  use crate::config::Prompts;
  use crate::seeds::{seed_groups, seed_lessons, seed_tips};
  use std::sync::Arc;

  fn state() -> AppState {
    let catalog = Catalog::build(seed_groups(), seed_lessons(), seed_tips(), None).expect("catalog");
    AppState { catalog: Arc::new(catalog), openai: None, prompts: Prompts::default() }
  }

  #[test]
  fn window_clamps_around_cursor() {
    let code: String = (1..=30).map(|i| format!("line{i}\n")).collect();
    let w = code_window(&code, Some(15), 2);
    let nums: Vec<&str> = w.lines().map(|l| l.split('|').next().unwrap_or("").trim()).collect();
    assert_eq!(nums, vec!["13", "14", "15", "16", "17"]);

    let w = code_window(&code, Some(1), 2);
    assert_eq!(w.lines().count(), 3);
    let w = code_window(&code, Some(999), 2);
    assert!(w.lines().last().unwrap_or("").ends_with("line30"));
    assert_eq!(code_window(&code, None, 2).lines().count(), 30);
    assert_eq!(code_window("", Some(3), 2), "");
  }

  #[test]
  fn local_hint_recognizes_common_errors() {
    assert!(local_hint("python", "print(x)", "NameError: name 'x' is not defined").contains("declared"));
    assert!(local_hint("javascript", "let = 1", "SyntaxError: Unexpected token '='").contains("bracket"));
    assert!(local_hint("python", "", "KeyError: 'a'").contains(".get()"));
    assert!(local_hint("python", "", "RecursionError: maximum recursion depth").contains("base case"));
  }

  #[test]
  fn local_hint_without_error_looks_at_code() {
    assert!(local_hint("python", "   ", "").contains("signature"));
    assert!(local_hint("python", "def f():\n    pass", "").contains("placeholder"));
    assert!(local_hint("javascript", "function f(a) { a + 1 }", "").contains("undefined"));
    assert!(local_hint("rust", "fn main() {}", "").contains("smallest input"));
  }

  #[tokio::test]
  async fn falls_back_to_local_hint_without_model() {
    let req = HintRequest {
      code: "print(x)".into(),
      language: "python".into(),
      error_message: Some("NameError: name 'x' is not defined".into()),
      cursor_line: Some(1),
    };
    let hint = get_hint_text(&state(), &req).await;
    assert_eq!(hint, local_hint("python", "print(x)", "NameError: name 'x' is not defined"));
  }
}
