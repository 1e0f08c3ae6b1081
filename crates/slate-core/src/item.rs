use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Task,
    Note,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Task => "task",
            Category::Note => "note",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Task => "Tasks",
            Category::Note => "Notes",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" | "tasks" => Ok(Category::Task),
            "note" | "notes" => Ok(Category::Note),
            other => Err(anyhow::anyhow!("unknown category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,

    pub name: String,

    pub entry: DateTime<Utc>,
}

impl Item {
    pub fn new(id: u64, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            entry: now,
        }
    }
}

// Ids come from the creation instant in milliseconds. Two creations inside
// the same millisecond bump past the last issued id, so ids stay unique and
// strictly increasing for the whole session.
#[derive(Debug, Default)]
pub struct IdIssuer {
    last: u64,
}

impl IdIssuer {
    pub fn next(&mut self, now: DateTime<Utc>) -> u64 {
        let stamp = now.timestamp_millis().max(0) as u64;
        self.last = stamp.max(self.last + 1);
        self.last
    }
}
