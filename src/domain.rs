//! Domain models: content groups, lessons (pages and code challenges) and daily tips.

use serde::{Deserialize, Serialize};

/// What kind of lesson is presented to the learner?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
  /// Reading material with inline examples.
  #[default]
  Content,
  /// Learner edits `starter_code` until it satisfies the lesson body.
  Challenge,
}

impl LessonKind {
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "content" => Some(LessonKind::Content),
      "challenge" => Some(LessonKind::Challenge),
      _ => None,
    }
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  #[default]
  Beginner,
  Intermediate,
  Advanced,
}

/// A content collection (course track). Lessons and tips point at it via `group_id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
  pub id: String,
  pub title: String,
  #[serde(default)] pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lesson {
  pub id: String,
  pub group_id: String,
  pub title: String,
  pub kind: LessonKind,
  pub difficulty: Difficulty,
  /// Position inside the group; ties are broken by id.
  pub order: u32,
  /// Programming language of `starter_code` (e.g. "javascript", "python").
  pub language: String,
  #[serde(default)] pub body: String,
  #[serde(default)] pub starter_code: String,
  #[serde(default)] pub solution: Option<String>,
  #[serde(default)] pub tags: Vec<String>,
}

/// A short daily tip. Only `id` and `group_id` matter for selection;
/// the remaining fields are display-only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tip {
  pub id: String,
  pub group_id: String,
  pub title: String,
  #[serde(default)] pub body: String,
  #[serde(default)] pub examples: Vec<String>,
}

/// Anything a date-seeded picker can draw from.
pub trait Pickable {
  fn id(&self) -> &str;
  fn group_id(&self) -> &str;
}

impl Pickable for Tip {
  fn id(&self) -> &str { &self.id }
  fn group_id(&self) -> &str { &self.group_id }
}

impl Pickable for Lesson {
  fn id(&self) -> &str { &self.id }
  fn group_id(&self) -> &str { &self.group_id }
}

impl<T: Pickable + ?Sized> Pickable for &T {
  fn id(&self) -> &str { (**self).id() }
  fn group_id(&self) -> &str { (**self).group_id() }
}
