//! Application state: the immutable content catalog, hint prompts, and the optional model client.
//!
//! Content is merged once at startup (built-in seeds first, then the TOML content file)
//! and never mutated afterwards, so handlers share it through an `Arc` without locks.

use std::{collections::HashSet, sync::Arc};
use tracing::{error, info, instrument, warn};

use crate::catalog::{Catalog, ContentError};
use crate::config::{load_content_config, ContentConfig, Prompts, ServerConfig};
use crate::domain::{Lesson, Tip};
use crate::openai::OpenAI;
use crate::seeds::{seed_groups, seed_lessons, seed_tips};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub openai: Option<OpenAI>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load content config, merge with seeds, validate, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new(server: &ServerConfig) -> Result<Self, ContentError> {
        let cfg = server
            .content_path
            .as_deref()
            .and_then(load_content_config)
            .unwrap_or_default();
        let prompts = cfg.prompts.clone();

        let catalog = match build_catalog(cfg) {
            Ok(c) => c,
            Err(e) => {
                error!(target: "content", error = %e, "Content file rejected; serving built-in content only");
                seed_catalog()?
            }
        };

        for g in catalog.groups() {
            let stats = catalog.group_stats(&g.id);
            info!(target: "content", group = %g.id, lessons = stats.lessons, challenges = stats.challenges, tips = stats.tips, "Startup content inventory");
        }

        // Build optional OpenAI client (if API key present).
        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "learnhub_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI hints enabled.");
        } else {
            info!(target: "learnhub_backend", "OpenAI disabled (no OPENAI_API_KEY). Using local hints.");
        }

        Ok(Self { catalog: Arc::new(catalog), openai, prompts })
    }
}

/// Built-in content only.
pub fn seed_catalog() -> Result<Catalog, ContentError> {
    Catalog::build(seed_groups(), seed_lessons(), seed_tips(), None)
}

/// Seeds first; config entries with an id already taken by a seed are skipped.
pub fn build_catalog(cfg: ContentConfig) -> Result<Catalog, ContentError> {
    let mut groups = seed_groups();
    let mut group_ids: HashSet<String> = groups.iter().map(|g| g.id.clone()).collect();
    for g in cfg.groups {
        if group_ids.insert(g.id.clone()) {
            groups.push(g);
        } else {
            warn!(target: "content", id = %g.id, "Skipping config group: id already used by built-in content");
        }
    }

    let mut lessons = seed_lessons();
    let mut lesson_ids: HashSet<String> = lessons.iter().map(|l| l.id.clone()).collect();
    for lc in cfg.lessons {
        let l: Lesson = lc.into();
        if lesson_ids.insert(l.id.clone()) {
            lessons.push(l);
        } else {
            warn!(target: "content", id = %l.id, "Skipping config lesson: duplicate id");
        }
    }

    let mut tips = seed_tips();
    let mut tip_ids: HashSet<String> = tips.iter().map(|t| t.id.clone()).collect();
    for tc in cfg.tips {
        let t: Tip = tc.into();
        if tip_ids.insert(t.id.clone()) {
            tips.push(t);
        } else {
            warn!(target: "content", id = %t.id, "Skipping config tip: duplicate id");
        }
    }

    Catalog::build(groups, lessons, tips, cfg.default_tip_groups)
}
