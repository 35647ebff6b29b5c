//! Public protocol structs for the HTTP API (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::catalog::GroupStats;
use crate::domain::{Difficulty, Group, Lesson, LessonKind, Tip};

//
// Hint contract (shared by the server endpoint and `HintClient`)
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    pub code: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_line: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HintOut {
    pub hint: String,
}

//
// Tips
//

#[derive(Debug, Deserialize, Default)]
pub struct DailyTipQuery {
    /// Comma-separated group ids; empty means the default groups.
    pub groups: Option<String>,
    /// Comma-separated tip ids already shown to this learner.
    pub shown: Option<String>,
    /// `YYYY-MM-DD`; defaults to today (UTC).
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyTipOut {
    pub date: String,
    pub tip: Option<Tip>,
}

//
// Lessons
//

#[derive(Debug, Deserialize, Default)]
pub struct LessonQuery {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub q: Option<String>,
}

/// List view: no body/code, so listings stay small.
#[derive(Debug, Serialize)]
pub struct LessonSummary {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub kind: LessonKind,
    pub difficulty: Difficulty,
    pub order: u32,
    pub language: String,
    pub tags: Vec<String>,
}

impl From<&Lesson> for LessonSummary {
    fn from(l: &Lesson) -> Self {
        LessonSummary {
            id: l.id.clone(),
            group_id: l.group_id.clone(),
            title: l.title.clone(),
            kind: l.kind,
            difficulty: l.difficulty,
            order: l.order,
            language: l.language.clone(),
            tags: l.tags.clone(),
        }
    }
}

/// Detail view. The solution never leaves the server.
#[derive(Debug, Serialize)]
pub struct LessonOut {
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub kind: LessonKind,
    pub difficulty: Difficulty,
    pub order: u32,
    pub language: String,
    pub body: String,
    pub starter_code: String,
    pub tags: Vec<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

pub fn to_lesson_out(l: &Lesson, prev: Option<&Lesson>, next: Option<&Lesson>) -> LessonOut {
    LessonOut {
        id: l.id.clone(),
        group_id: l.group_id.clone(),
        title: l.title.clone(),
        kind: l.kind,
        difficulty: l.difficulty,
        order: l.order,
        language: l.language.clone(),
        body: l.body.clone(),
        starter_code: l.starter_code.clone(),
        tags: l.tags.clone(),
        prev: prev.map(|p| p.id.clone()),
        next: next.map(|n| n.id.clone()),
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct DailyChallengeQuery {
    pub groups: Option<String>,
    /// Comma-separated challenge ids the learner already solved.
    pub completed: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyChallengeOut {
    pub date: String,
    pub challenge: Option<LessonOut>,
}

//
// Groups / misc
//

#[derive(Debug, Serialize)]
pub struct GroupOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub lessons: usize,
    pub challenges: usize,
    pub tips: usize,
}

pub fn to_group_out(g: &Group, stats: GroupStats) -> GroupOut {
    GroupOut {
        id: g.id.clone(),
        title: g.title.clone(),
        description: g.description.clone(),
        lessons: stats.lessons,
        challenges: stats.challenges,
        tips: stats.tips,
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub error: String,
}
