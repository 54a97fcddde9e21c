use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    Before,
    After,
    Progress,
    Other,
}

impl PhotoKind {
    pub fn as_str(&self) -> &str {
        match self {
            PhotoKind::Before => "before",
            PhotoKind::After => "after",
            PhotoKind::Progress => "progress",
            PhotoKind::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "before" => Ok(PhotoKind::Before),
            "after" => Ok(PhotoKind::After),
            "progress" => Ok(PhotoKind::Progress),
            "other" => Ok(PhotoKind::Other),
            other => Err(format!("Unknown photo kind: {other}")),
        }
    }
}

impl fmt::Display for PhotoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
