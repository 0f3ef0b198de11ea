use chrono::{SecondsFormat, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::id::uid;

/// Selects one of the two independent category families. Prompts and
/// checkpoints are categorized separately; an id is only unique within its
/// own family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Prompt,
    Checkpoint,
}

impl Family {
    pub fn id_prefix(self) -> &'static str {
        match self {
            Family::Prompt => "cat",
            Family::Checkpoint => "cpcat",
        }
    }

    pub fn category_label(self) -> &'static str {
        match self {
            Family::Prompt => "category",
            Family::Checkpoint => "checkpoint category",
        }
    }

    pub fn item_label(self) -> &'static str {
        match self {
            Family::Prompt => "prompt",
            Family::Checkpoint => "checkpoint",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(family: Family, name: impl Into<String>) -> Self {
        Self {
            id: uid(family.id_prefix()),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub body: String,
}

impl Prompt {
    pub fn new(
        category_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: uid("p"),
            category_id: category_id.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub description: String,
    pub body: String,
    /// Stamped at create/update time; preserved verbatim through
    /// export/import.
    pub saved_at: String,
}

impl Checkpoint {
    pub fn new(
        category_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: uid("cp"),
            category_id: category_id.into(),
            title: title.into(),
            description: description.into(),
            body: body.into(),
            saved_at: now_iso(),
        }
    }
}

/// Current UTC time as an RFC 3339 string, the wire format for `savedAt`
/// and envelope timestamps.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The aggregate root: the whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub categories: Vec<Category>,
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub checkpoint_categories: Vec<Category>,
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
}

/// Counts of each collection, for import diff summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryCounts {
    pub categories: usize,
    pub prompts: usize,
    pub checkpoint_categories: usize,
    pub checkpoints: usize,
}

impl Library {
    pub fn family_categories(&self, family: Family) -> &[Category] {
        match family {
            Family::Prompt => &self.categories,
            Family::Checkpoint => &self.checkpoint_categories,
        }
    }

    pub fn family_categories_mut(&mut self, family: Family) -> &mut Vec<Category> {
        match family {
            Family::Prompt => &mut self.categories,
            Family::Checkpoint => &mut self.checkpoint_categories,
        }
    }

    /// Drop prompts and checkpoints whose category no longer exists.
    ///
    /// This is the lenient self-healing pass for locally-persisted state;
    /// imported documents are held to the strict policy in [`crate::validate`]
    /// instead.
    pub fn normalize(&mut self) {
        let category_ids: std::collections::HashSet<&str> =
            self.categories.iter().map(|c| c.id.as_str()).collect();
        self.prompts
            .retain(|p| category_ids.contains(p.category_id.as_str()));

        let checkpoint_category_ids: std::collections::HashSet<&str> = self
            .checkpoint_categories
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        self.checkpoints
            .retain(|c| checkpoint_category_ids.contains(c.category_id.as_str()));
    }

    pub fn counts(&self) -> LibraryCounts {
        LibraryCounts {
            categories: self.categories.len(),
            prompts: self.prompts.len(),
            checkpoint_categories: self.checkpoint_categories.len(),
            checkpoints: self.checkpoints.len(),
        }
    }
}

static SAMPLE: Lazy<Library> = Lazy::new(|| {
    let categories = vec![
        Category {
            id: "cat_work".to_string(),
            name: "Work / InfoSec".to_string(),
        },
        Category {
            id: "cat_science".to_string(),
            name: "Philosophy / Science".to_string(),
        },
        Category {
            id: "cat_scratch".to_string(),
            name: "Scratch".to_string(),
        },
    ];

    let prompts = vec![
        Prompt {
            id: "p_risk_summary".to_string(),
            category_id: "cat_work".to_string(),
            title: "Risk summary (1 page)".to_string(),
            body: "Write a 1-page risk summary.\n\nContext:\n- System/Process:\n- Data types:\n- Threats:\n- Controls:\n- Residual risk:\n- Recommended next steps:\n\nConstraints:\n- Be precise and non-alarmist.\n- Include assumptions explicitly.".to_string(),
        },
        Prompt {
            id: "p_policy_rewrite".to_string(),
            category_id: "cat_work".to_string(),
            title: "Policy clause rewrite".to_string(),
            body: "Rewrite the following policy clause for clarity, enforceability, and least-privilege alignment.\n\nClause:\n<PASTE HERE>\n\nRequirements:\n- Keep intent the same unless you flag changes.\n- Provide: (1) clean rewrite (2) annotated rationale (3) options if tradeoffs exist.".to_string(),
        },
        Prompt {
            id: "p_first_principles".to_string(),
            category_id: "cat_science".to_string(),
            title: "First-principles explanation".to_string(),
            body: "Explain this from first principles.\n\nTopic:\n<PASTE HERE>\n\nConstraints:\n- Define terms on first use.\n- Make assumptions explicit.\n- Use one or two logical steps at a time, and pause at natural checkpoints.".to_string(),
        },
        Prompt {
            id: "p_blank_scaffold".to_string(),
            category_id: "cat_scratch".to_string(),
            title: "Blank scaffold".to_string(),
            body: "Context:\n\nGoal:\n\nConstraints:\n\nWhat I tried:\n\nQuestion:".to_string(),
        },
    ];

    Library {
        checkpoint_categories: categories.clone(),
        categories,
        prompts,
        checkpoints: Vec::new(),
    }
});

/// A deep copy of the fixed seed library. Never hands out the static itself,
/// so callers are free to mutate the result.
pub fn sample_library() -> Library {
    SAMPLE.clone()
}
