use serde::{Deserialize, Serialize};
use std::fmt;

/// The three independent result partitions shown as tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Blur,
    Similar,
    Error,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Blur, Category::Similar, Category::Error];

    pub fn name(self) -> &'static str {
        match self {
            Category::Blur => "blur",
            Category::Similar => "similar",
            Category::Error => "error",
        }
    }

    /// Label used on the result tabs.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Blur => "Blurry images",
            Category::Similar => "Similar images",
            Category::Error => "Errors",
        }
    }

    /// Categories whose selected files feed trash/delete/move.
    pub fn holds_files(self) -> bool {
        !matches!(self, Category::Error)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
