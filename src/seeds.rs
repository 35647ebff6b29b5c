//! Built-in content that guarantees the app is useful even without a content file.

use crate::domain::{Difficulty, Group, Lesson, LessonKind, Tip};

pub fn seed_groups() -> Vec<Group> {
  vec![
    Group {
      id: "javascript".into(),
      title: "JavaScript Foundations".into(),
      description: "Values, functions, arrays and the async model.".into(),
    },
    Group {
      id: "python".into(),
      title: "Python Basics".into(),
      description: "Syntax, collections and idiomatic loops.".into(),
    },
    Group {
      id: "web".into(),
      title: "Web Essentials".into(),
      description: "HTTP, the DOM and talking to APIs.".into(),
    },
  ]
}

#[allow(clippy::too_many_arguments)]
fn lesson(
  id: &str,
  group_id: &str,
  order: u32,
  kind: LessonKind,
  difficulty: Difficulty,
  language: &str,
  title: &str,
  body: &str,
  starter_code: &str,
  tags: &[&str],
) -> Lesson {
  Lesson {
    id: id.into(),
    group_id: group_id.into(),
    title: title.into(),
    kind,
    difficulty,
    order,
    language: language.into(),
    body: body.into(),
    starter_code: starter_code.into(),
    solution: None,
    tags: tags.iter().map(|t| t.to_string()).collect(),
  }
}

pub fn seed_lessons() -> Vec<Lesson> {
  use Difficulty::*;
  use LessonKind::*;
  vec![
    lesson(
      "js-variables", "javascript", 1, Content, Beginner, "javascript",
      "Variables with let and const",
      "Use `const` by default and `let` when the binding must change. Avoid `var`: it is function-scoped and hoisted.",
      "const greeting = 'hello';\nlet count = 0;\ncount += 1;\n",
      &["variables", "scope"],
    ),
    lesson(
      "js-functions", "javascript", 2, Content, Beginner, "javascript",
      "Functions and arrow functions",
      "Arrow functions keep the surrounding `this`. Prefer them for callbacks.",
      "const double = (n) => n * 2;\n",
      &["functions", "arrow"],
    ),
    lesson(
      "js-sum-array", "javascript", 3, Challenge, Beginner, "javascript",
      "Sum an array",
      "Write `sum(numbers)` returning the total of all numbers. An empty array sums to 0.",
      "function sum(numbers) {\n  // your code here\n}\n",
      &["arrays", "reduce"],
    ),
    lesson(
      "js-fetch-json", "javascript", 4, Challenge, Intermediate, "javascript",
      "Fetch and parse JSON",
      "Write `async function getTitle(url)` that fetches `url` and returns the `title` field of the JSON body.",
      "async function getTitle(url) {\n  // your code here\n}\n",
      &["async", "fetch", "promises"],
    ),
    lesson(
      "py-lists", "python", 1, Content, Beginner, "python",
      "Lists and slicing",
      "Lists are ordered and mutable. `items[1:3]` copies a slice; negative indices count from the end.",
      "items = [1, 2, 3, 4]\nprint(items[-1])\n",
      &["lists", "slicing"],
    ),
    lesson(
      "py-word-count", "python", 2, Challenge, Beginner, "python",
      "Count words",
      "Write `word_count(text)` returning a dict mapping each lowercase word to how often it appears.",
      "def word_count(text):\n    # your code here\n    pass\n",
      &["dict", "strings"],
    ),
    lesson(
      "py-fizzbuzz", "python", 3, Challenge, Beginner, "python",
      "FizzBuzz",
      "Return a list of strings for 1..=n: multiples of 3 become 'Fizz', of 5 'Buzz', of both 'FizzBuzz'.",
      "def fizzbuzz(n):\n    # your code here\n    pass\n",
      &["loops", "conditionals"],
    ),
    lesson(
      "web-http-basics", "web", 1, Content, Beginner, "http",
      "Requests and responses",
      "Every HTTP exchange is a method, a path, headers and an optional body. Status codes in the 2xx range mean success.",
      "",
      &["http", "status codes"],
    ),
    lesson(
      "web-dom-toggle", "web", 2, Challenge, Intermediate, "javascript",
      "Toggle a class",
      "When the button with id `toggle` is clicked, toggle the `dark` class on `document.body`.",
      "const button = document.getElementById('toggle');\n",
      &["dom", "events"],
    ),
  ]
}

fn tip(id: &str, group_id: &str, title: &str, body: &str, examples: &[&str]) -> Tip {
  Tip {
    id: id.into(),
    group_id: group_id.into(),
    title: title.into(),
    body: body.into(),
    examples: examples.iter().map(|e| e.to_string()).collect(),
  }
}

pub fn seed_tips() -> Vec<Tip> {
  vec![
    tip("js-tip-optional-chaining", "javascript", "Optional chaining",
      "`a?.b?.c` stops at the first null or undefined instead of throwing.",
      &["const city = user?.address?.city;"]),
    tip("js-tip-nullish", "javascript", "Nullish coalescing",
      "`??` only falls back on null/undefined, so `0` and `''` survive.",
      &["const retries = config.retries ?? 3;"]),
    tip("js-tip-strict-equality", "javascript", "Prefer ===",
      "`===` compares without type coercion; `'1' == 1` is true but `'1' === 1` is not.",
      &[]),
    tip("py-tip-enumerate", "python", "enumerate()",
      "Loop with an index without `range(len(...))`.",
      &["for i, item in enumerate(items):\n    print(i, item)"]),
    tip("py-tip-fstrings", "python", "f-strings",
      "Interpolate expressions directly: `f\"{name} is {age}\"`. Add `=` to debug: `f\"{x=}\"`.",
      &["print(f\"{total=}\")"]),
    tip("py-tip-mutable-default", "python", "Mutable default arguments",
      "Default values are evaluated once. Use `None` and create the list inside the function.",
      &["def add(item, bucket=None):\n    bucket = bucket or []"]),
    tip("web-tip-status-codes", "web", "4xx vs 5xx",
      "4xx means the request was wrong; 5xx means the server failed. Retry only the latter.",
      &[]),
    tip("web-tip-devtools-network", "web", "Network tab",
      "The browser's Network tab shows every request, its headers and timing.",
      &[]),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;

  #[test]
  fn seeds_form_a_valid_catalog() {
    let c = Catalog::build(seed_groups(), seed_lessons(), seed_tips(), None).expect("seed catalog");
    for g in c.groups() {
      assert!(!c.tips_in_groups(&[g.id.as_str()]).is_empty(), "group {} has no tips", g.id);
      assert!(!c.lessons_in_group(&g.id).is_empty(), "group {} has no lessons", g.id);
    }
    assert!(!c.challenges().is_empty());
  }
}
