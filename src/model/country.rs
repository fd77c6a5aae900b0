//! Country (organisation unit) entity

use super::table::Row;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which a country row stores its sub-units
pub const CHILDREN_KEY: &str = "children";

/// An organisation unit: a country at level 1, regions and districts below
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    pub level: u32,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub children: Vec<Country>,
}

impl Country {
    /// Copy of this unit with descendants deeper than `max_level` removed
    pub fn pruned(&self, max_level: u32) -> Country {
        Country {
            children: self
                .children
                .iter()
                .filter(|child| child.level <= max_level)
                .map(|child| child.pruned(max_level))
                .collect(),
            ..self.clone()
        }
    }

    /// Table row for this unit, sub-units nested under [`CHILDREN_KEY`]
    pub fn to_row(&self) -> Row {
        let mut row = Row::new(self.id.clone())
            .with_field("name", self.name.clone())
            .with_field("level", self.level);

        if let Some(code) = &self.code {
            row = row.with_field("code", code.clone());
        }
        if let Some(last_updated) = &self.last_updated {
            row = row.with_field("lastUpdated", last_updated.clone());
        }
        if !self.children.is_empty() {
            let children: Vec<Value> = self
                .children
                .iter()
                .map(|child| serde_json::to_value(child.to_row()).unwrap_or(Value::Null))
                .collect();
            row = row.with_field(CHILDREN_KEY, children);
        }
        row
    }
}
