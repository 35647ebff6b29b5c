//! Configuration: server settings from the environment and an optional TOML content file
//! (hint prompts, default tip groups, extra groups/lessons/tips).
//!
//! See `ContentConfig` and `Prompts` for the expected schema.

use std::net::SocketAddr;

use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{Difficulty, Group, Lesson, LessonKind, Tip};

/// Process-level settings read once at startup.
#[derive(Clone, Debug)]
pub struct ServerConfig {
  pub addr: SocketAddr,
  pub static_dir: String,
  pub content_path: Option<String>,
}

impl ServerConfig {
  /// PORT (default 3000), STATIC_DIR (default ./static), CONTENT_CONFIG_PATH (optional).
  pub fn from_env() -> Self {
    let port = std::env::var("PORT")
      .ok()
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(3000);
    Self {
      addr: SocketAddr::from(([0, 0, 0, 0], port)),
      static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".into()),
      content_path: std::env::var("CONTENT_CONFIG_PATH").ok().filter(|p| !p.trim().is_empty()),
    }
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ContentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  /// Groups used by the daily pickers when the caller passes none.
  #[serde(default)]
  pub default_tip_groups: Option<Vec<String>>,
  #[serde(default)]
  pub groups: Vec<Group>,
  #[serde(default)]
  pub lessons: Vec<LessonCfg>,
  #[serde(default)]
  pub tips: Vec<TipCfg>,
}

/// Lesson entry accepted in TOML. Missing `id` gets a random UUID.
#[derive(Clone, Debug, Deserialize)]
pub struct LessonCfg {
  #[serde(default)] pub id: Option<String>,
  pub group_id: String,
  pub title: String,
  #[serde(default)] pub kind: LessonKind,
  #[serde(default)] pub difficulty: Difficulty,
  #[serde(default)] pub order: u32,
  #[serde(default = "default_language")] pub language: String,
  #[serde(default)] pub body: String,
  #[serde(default)] pub starter_code: String,
  #[serde(default)] pub solution: Option<String>,
  #[serde(default)] pub tags: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TipCfg {
  #[serde(default)] pub id: Option<String>,
  pub group_id: String,
  pub title: String,
  #[serde(default)] pub body: String,
  #[serde(default)] pub examples: Vec<String>,
}

fn default_language() -> String { "javascript".into() }

impl From<LessonCfg> for Lesson {
  fn from(c: LessonCfg) -> Self {
    Lesson {
      id: c.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
      group_id: c.group_id,
      title: c.title,
      kind: c.kind,
      difficulty: c.difficulty,
      order: c.order,
      language: c.language,
      body: c.body,
      starter_code: c.starter_code,
      solution: c.solution,
      tags: c.tags,
    }
  }
}

impl From<TipCfg> for Tip {
  fn from(c: TipCfg) -> Self {
    Tip {
      id: c.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
      group_id: c.group_id,
      title: c.title,
      body: c.body,
      examples: c.examples,
    }
  }
}

/// Prompts used by the hint model. Defaults target short, non-spoiling coding hints.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub hint_system: String,
  pub hint_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      hint_system: "You are a patient programming tutor. Give ONE short hint (max 2 sentences). Never write the full solution.".into(),
      hint_user_template: "Language: {language}\nCursor line: {cursor_line}\nError: {error_message}\n\nCode:\n{code}\n\nGive one hint that helps the learner take the next step.".into(),
    }
  }
}

/// Parse a content file. Kept separate from the env lookup so it can be tested directly.
pub fn parse_content_config(s: &str) -> Result<ContentConfig, toml::de::Error> {
  toml::from_str::<ContentConfig>(s)
}

/// Attempt to load `ContentConfig` from `path`. On any parsing/IO error, returns None.
pub fn load_content_config(path: &str) -> Option<ContentConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match parse_content_config(&s) {
      Ok(cfg) => {
        info!(target: "content", %path, groups = cfg.groups.len(), lessons = cfg.lessons.len(), tips = cfg.tips.len(), "Loaded content config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "content", %path, error = %e, "Failed to parse TOML content config");
        None
      }
    },
    Err(e) => {
      error!(target: "content", %path, error = %e, "Failed to read TOML content config");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundled_example_content_file_parses_and_builds() {
    let cfg = parse_content_config(include_str!("../content.example.toml")).expect("example parses");
    assert_eq!(cfg.groups.len(), 1);
    assert_eq!(cfg.lessons.len(), 2);
    assert_eq!(cfg.tips.len(), 1);
    let catalog = crate::state::build_catalog(cfg).expect("example builds");
    assert!(catalog.group("rust").is_some());
    assert!(catalog.lesson("rs-parse-sum").is_some());
    assert_eq!(catalog.default_tip_groups(), ["javascript", "python", "rust"]);
  }

  #[test]
  fn parses_full_content_file() {
    let cfg = parse_content_config(
      r#"
default_tip_groups = ["rust"]

[prompts]
hint_system = "Be brief."

[[groups]]
id = "rust"
title = "Rust"

[[lessons]]
id = "rs-1"
group_id = "rust"
title = "Ownership"
kind = "challenge"
difficulty = "advanced"
order = 1
language = "rust"
tags = ["ownership"]

[[tips]]
group_id = "rust"
title = "Use ?"
body = "Propagate errors with ?"
"#,
    )
    .expect("parse");

    assert_eq!(cfg.default_tip_groups, Some(vec!["rust".to_string()]));
    assert_eq!(cfg.prompts.hint_system, "Be brief.");
    // unspecified prompt fields keep their defaults
    assert_eq!(cfg.prompts.hint_user_template, Prompts::default().hint_user_template);
    assert_eq!(cfg.groups[0].description, "");

    let lesson: Lesson = cfg.lessons[0].clone().into();
    assert_eq!(lesson.kind, LessonKind::Challenge);
    assert_eq!(lesson.difficulty, Difficulty::Advanced);

    let tip: Tip = cfg.tips[0].clone().into();
    assert!(Uuid::parse_str(&tip.id).is_ok());
  }

  #[test]
  fn lesson_defaults_apply() {
    let cfg = parse_content_config("[[lessons]]\ngroup_id = \"g\"\ntitle = \"T\"\n").expect("parse");
    let l: Lesson = cfg.lessons[0].clone().into();
    assert_eq!(l.kind, LessonKind::Content);
    assert_eq!(l.language, "javascript");
    assert_eq!(l.order, 0);
  }

  #[test]
  fn rejects_malformed_toml() {
    assert!(parse_content_config("[[tips]]\ntitle = 3").is_err());
    assert!(load_content_config("/definitely/not/here.toml").is_none());
  }
}
