use crate::ingest;
use serde::{Deserialize, Serialize};

/// Entry of the flat item reference catalog, independent of any one pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default, deserialize_with = "ingest::opt_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "ingest::opt_text", skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, deserialize_with = "ingest::text")]
    pub name: String,
    #[serde(default, deserialize_with = "ingest::opt_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CatalogItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn identity(&self) -> &str {
        ingest::item_identity(self.id.as_deref(), self.item_id.as_deref(), &self.name)
    }
}
