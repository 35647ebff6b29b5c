//! Immutable content catalog: groups, lessons and tips, validated once at startup.
//!
//! The catalog is built before the server starts and then shared read-only
//! (`Arc<Catalog>`), so lookups never lock.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::{Group, Lesson, LessonKind, Tip};
use crate::selector::{DailyPicker, CHALLENGE_SEED_SUFFIX, TIP_SEED_SUFFIX};
use crate::util::today_iso;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContentError {
  #[error("Duplicate {kind} id '{id}'")]
  DuplicateId { kind: &'static str, id: String },

  #[error("{kind} '{id}' references unknown group '{group_id}'")]
  UnknownGroup { kind: &'static str, id: String, group_id: String },

  #[error("{kind} has an empty {field}")]
  EmptyField { kind: &'static str, field: &'static str },

  #[error("Default tip group '{0}' is not a declared group")]
  UnknownDefaultGroup(String),
}

#[derive(Debug, Clone)]
pub struct Catalog {
  groups: Vec<Group>,
  lessons: Vec<Lesson>,
  tips: Vec<Tip>,
  default_tip_groups: Vec<String>,
  group_rank: HashMap<String, usize>,
  lesson_idx: HashMap<String, usize>,
  tip_idx: HashMap<String, usize>,
}

/// Per-group inventory used by the groups listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
  pub lessons: usize,
  pub challenges: usize,
  pub tips: usize,
}

impl Catalog {
  /// Validate and index content. `default_tip_groups = None` means every declared group.
  #[instrument(level = "info", skip_all, fields(groups = groups.len(), lessons = lessons.len(), tips = tips.len()))]
  pub fn build(
    groups: Vec<Group>,
    lessons: Vec<Lesson>,
    tips: Vec<Tip>,
    default_tip_groups: Option<Vec<String>>,
  ) -> Result<Self, ContentError> {
    let mut group_rank = HashMap::new();
    for (i, g) in groups.iter().enumerate() {
      if g.id.trim().is_empty() {
        return Err(ContentError::EmptyField { kind: "group", field: "id" });
      }
      if group_rank.insert(g.id.clone(), i).is_some() {
        return Err(ContentError::DuplicateId { kind: "group", id: g.id.clone() });
      }
    }

    let mut lesson_idx = HashMap::new();
    for (i, l) in lessons.iter().enumerate() {
      check_entry("lesson", &l.id, &l.title, &l.group_id, &group_rank)?;
      if lesson_idx.insert(l.id.clone(), i).is_some() {
        return Err(ContentError::DuplicateId { kind: "lesson", id: l.id.clone() });
      }
    }

    let mut tip_idx = HashMap::new();
    for (i, t) in tips.iter().enumerate() {
      check_entry("tip", &t.id, &t.title, &t.group_id, &group_rank)?;
      if tip_idx.insert(t.id.clone(), i).is_some() {
        return Err(ContentError::DuplicateId { kind: "tip", id: t.id.clone() });
      }
    }

    let default_tip_groups = match default_tip_groups {
      Some(list) if !list.is_empty() => {
        if let Some(bad) = list.iter().find(|g| !group_rank.contains_key(*g)) {
          return Err(ContentError::UnknownDefaultGroup(bad.clone()));
        }
        list
      }
      _ => groups.iter().map(|g| g.id.clone()).collect(),
    };

    info!(target: "content", default_tip_groups = ?default_tip_groups, "Catalog built");
    Ok(Self { groups, lessons, tips, default_tip_groups, group_rank, lesson_idx, tip_idx })
  }

  pub fn groups(&self) -> &[Group] { &self.groups }

  pub fn group(&self, id: &str) -> Option<&Group> {
    self.group_rank.get(id).map(|&i| &self.groups[i])
  }

  pub fn group_stats(&self, id: &str) -> GroupStats {
    let lessons = self.lessons.iter().filter(|l| l.group_id == id);
    let (mut total, mut challenges) = (0, 0);
    for l in lessons {
      total += 1;
      if l.kind == LessonKind::Challenge { challenges += 1; }
    }
    GroupStats {
      lessons: total,
      challenges,
      tips: self.tips.iter().filter(|t| t.group_id == id).count(),
    }
  }

  pub fn default_tip_groups(&self) -> &[String] { &self.default_tip_groups }

  pub fn tips(&self) -> &[Tip] { &self.tips }

  pub fn tip(&self, id: &str) -> Option<&Tip> {
    self.tip_idx.get(id).map(|&i| &self.tips[i])
  }

  pub fn tips_in_groups<G: AsRef<str>>(&self, groups: &[G]) -> Vec<&Tip> {
    let set: HashSet<&str> = groups.iter().map(AsRef::as_ref).collect();
    self.tips.iter().filter(|t| set.contains(t.group_id.as_str())).collect()
  }

  pub fn lesson(&self, id: &str) -> Option<&Lesson> {
    self.lesson_idx.get(id).map(|&i| &self.lessons[i])
  }

  /// Lessons of one group in course order (`order`, then `id`).
  pub fn lessons_in_group(&self, group_id: &str) -> Vec<&Lesson> {
    let mut out: Vec<&Lesson> = self.lessons.iter().filter(|l| l.group_id == group_id).collect();
    out.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    out
  }

  /// Every lesson, grouped by group declaration order, then course order.
  pub fn lessons_in_course_order(&self) -> Vec<&Lesson> {
    let mut out: Vec<&Lesson> = self.lessons.iter().collect();
    self.sort_course_order(&mut out);
    out
  }

  pub fn lessons_by_kind(&self, kind: LessonKind) -> Vec<&Lesson> {
    let mut out: Vec<&Lesson> = self.lessons.iter().filter(|l| l.kind == kind).collect();
    self.sort_course_order(&mut out);
    out
  }

  /// All challenge lessons in catalog (declaration) order; this is the draw
  /// order of the daily challenge.
  pub fn challenges(&self) -> Vec<&Lesson> {
    self.lessons.iter().filter(|l| l.kind == LessonKind::Challenge).collect()
  }

  /// Previous and next lesson ids within the lesson's group.
  pub fn neighbors(&self, lesson_id: &str) -> Option<(Option<&Lesson>, Option<&Lesson>)> {
    let lesson = self.lesson(lesson_id)?;
    let ordered = self.lessons_in_group(&lesson.group_id);
    let pos = ordered.iter().position(|l| l.id == lesson.id)?;
    let prev = pos.checked_sub(1).map(|p| ordered[p]);
    let next = ordered.get(pos + 1).copied();
    Some((prev, next))
  }

  /// Case-insensitive substring search over titles and tags, in course order.
  pub fn search_lessons(&self, query: &str) -> Vec<&Lesson> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
      return Vec::new();
    }
    let mut out: Vec<&Lesson> = self
      .lessons
      .iter()
      .filter(|l| l.title.to_lowercase().contains(&q) || l.tags.iter().any(|t| t.to_lowercase().contains(&q)))
      .collect();
    self.sort_course_order(&mut out);
    out
  }

  /// Tip of the day for `date` (today when `None`).
  pub fn select_tip<G: AsRef<str>, S: AsRef<str>>(
    &self,
    active_groups: &[G],
    shown_ids: &[S],
    date: Option<&str>,
  ) -> Option<&Tip> {
    let date = date.map(str::to_string).unwrap_or_else(today_iso);
    DailyPicker::new(TIP_SEED_SUFFIX, &self.default_tip_groups).pick(&self.tips, active_groups, shown_ids, &date)
  }

  /// Challenge of the day. Uses its own seed namespace so it does not follow the tip.
  pub fn daily_challenge<G: AsRef<str>, S: AsRef<str>>(
    &self,
    active_groups: &[G],
    completed_ids: &[S],
    date: Option<&str>,
  ) -> Option<&Lesson> {
    let date = date.map(str::to_string).unwrap_or_else(today_iso);
    let challenges = self.challenges();
    DailyPicker::new(CHALLENGE_SEED_SUFFIX, &self.default_tip_groups)
      .pick(&challenges, active_groups, completed_ids, &date)
      .copied()
  }

  fn sort_course_order(&self, lessons: &mut [&Lesson]) {
    lessons.sort_by(|a, b| {
      let ra = self.group_rank.get(&a.group_id).copied().unwrap_or(usize::MAX);
      let rb = self.group_rank.get(&b.group_id).copied().unwrap_or(usize::MAX);
      ra.cmp(&rb).then(a.order.cmp(&b.order)).then_with(|| a.id.cmp(&b.id))
    });
  }
}

fn check_entry(
  kind: &'static str,
  id: &str,
  title: &str,
  group_id: &str,
  groups: &HashMap<String, usize>,
) -> Result<(), ContentError> {
  if id.trim().is_empty() {
    return Err(ContentError::EmptyField { kind, field: "id" });
  }
  if title.trim().is_empty() {
    return Err(ContentError::EmptyField { kind, field: "title" });
  }
  if !groups.contains_key(group_id) {
    return Err(ContentError::UnknownGroup { kind, id: id.to_string(), group_id: group_id.to_string() });
  }
  Ok(())
}
