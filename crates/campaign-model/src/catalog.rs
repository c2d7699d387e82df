//! User-editable option lists for campaign and course selection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dropdown option lists, stored as `dropdown_config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionCatalog {
    #[serde(rename = "CAMPAIGNS")]
    pub campaigns: Vec<String>,
    #[serde(rename = "EXAMS")]
    pub exams: Vec<String>,
    #[serde(rename = "STREAMS")]
    pub streams: Vec<String>,
    #[serde(rename = "SUBJECTS")]
    pub subjects: Vec<String>,
    #[serde(rename = "OFFERINGS")]
    pub offerings: Vec<String>,
}

/// One of the editable lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionCategory {
    Campaigns,
    Exams,
    Streams,
    Subjects,
    Offerings,
}

impl OptionCategory {
    pub const ALL: [OptionCategory; 5] = [
        OptionCategory::Campaigns,
        OptionCategory::Exams,
        OptionCategory::Streams,
        OptionCategory::Subjects,
        OptionCategory::Offerings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Campaigns => "campaigns",
            Self::Exams => "exams",
            Self::Streams => "streams",
            Self::Subjects => "subjects",
            Self::Offerings => "offerings",
        }
    }
}

impl fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown option category '{s}' \
                     (use campaigns, exams, streams, subjects, offerings)"
                )
            })
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self {
            campaigns: owned(&["Super Sale", "Maha Sale", "Flash Sale", "Wow Sale"]),
            exams: owned(&[
                "",
                "RBI Grade B",
                "RBI Grade A/B",
                "SEBI Grade A",
                "NABARD Grade A",
                "IRDAI Grade A",
                "PFRDA Grade A",
                "IFSCA Grade A",
                "UPSC CSAT",
                "UPSC EPFO APFC & EO/AO",
                "JAIIB",
                "Banking Exams",
            ]),
            streams: owned(&["", "General Stream"]),
            subjects: owned(&[
                "", "Quant", "Reasoning", "English", "AFM", "PPB", "IF&IFS", "RBWM", "ABM", "BFM",
                "ABFM", "BRBL", "Maths",
            ]),
            offerings: owned(&[
                "Gold",
                "Silver",
                "Test Series",
                "Crash Course",
                "Master Course",
                "Live Crash Course",
                "Special Subjects",
                "Super Crash Course",
                "Banker's Capsule Course",
                "Mahapack",
                "Combo",
                "Quick Revision Batch",
            ]),
        }
    }
}

impl OptionCatalog {
    /// Load the catalog, filling absent lists from the defaults.
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(catalog) => catalog,
                Err(e) => {
                    tracing::warn!("Failed to parse option catalog at {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read option catalog at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    pub fn list(&self, category: OptionCategory) -> &[String] {
        match category {
            OptionCategory::Campaigns => &self.campaigns,
            OptionCategory::Exams => &self.exams,
            OptionCategory::Streams => &self.streams,
            OptionCategory::Subjects => &self.subjects,
            OptionCategory::Offerings => &self.offerings,
        }
    }

    fn list_mut(&mut self, category: OptionCategory) -> &mut Vec<String> {
        match category {
            OptionCategory::Campaigns => &mut self.campaigns,
            OptionCategory::Exams => &mut self.exams,
            OptionCategory::Streams => &mut self.streams,
            OptionCategory::Subjects => &mut self.subjects,
            OptionCategory::Offerings => &mut self.offerings,
        }
    }

    /// Append a trimmed item. Returns `false` for blank or duplicate items.
    pub fn add(&mut self, category: OptionCategory, item: &str) -> bool {
        let item = item.trim();
        if item.is_empty() {
            return false;
        }
        let list = self.list_mut(category);
        if list.iter().any(|existing| existing == item) {
            return false;
        }
        list.push(item.to_string());
        true
    }
}
