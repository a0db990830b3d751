use crate::ingest;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Canonical price. Legacy exports carry a bare number; those normalize to an
/// empty currency label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl Price {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount: ingest::non_negative(amount),
            currency: currency.into(),
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(fields) => Price {
                amount: fields.get("amount").map(ingest::value_to_f64).unwrap_or(0.0),
                currency: fields
                    .get("currency")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            other => Price {
                amount: ingest::value_to_f64(other),
                currency: String::new(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Price::from_json(&value))
    }
}

/// One line of a pack's contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "ingest::opt_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "ingest::opt_text", skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, deserialize_with = "ingest::text")]
    pub name: String,
    #[serde(default, deserialize_with = "ingest::number")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "ingest::opt_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "ingest::number")]
    pub value: f64,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity: ingest::non_negative(quantity),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>, value: f64) -> Self {
        self.category = Some(category.into());
        self.value = ingest::non_negative(value);
        self
    }

    pub fn identity(&self) -> &str {
        ingest::item_identity(self.id.as_deref(), self.item_id.as_deref(), &self.name)
    }
}

/// A purchasable bundle as it appears in the raw catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pack {
    #[serde(default, deserialize_with = "ingest::text")]
    pub id: String,
    #[serde(default, deserialize_with = "ingest::text")]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default, deserialize_with = "ingest::number")]
    pub value: f64,
    #[serde(default, deserialize_with = "ingest::flag")]
    pub is_reference: bool,
    #[serde(default, deserialize_with = "ingest::list")]
    pub items: Vec<Item>,
    #[serde(default, deserialize_with = "ingest::opt_number", skip_serializing_if = "Option::is_none")]
    pub profile_score: Option<f64>,
    /// Value per dollar precomputed by the export, if any. The merged figure
    /// lives on [`EnrichedPack`].
    #[serde(
        default,
        rename = "value_per_dollar",
        deserialize_with = "ingest::opt_number",
        skip_serializing
    )]
    pub listed_value_per_dollar: Option<f64>,
}

impl Pack {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price, value: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            value: ingest::non_negative(value),
            ..Self::default()
        }
    }

    pub fn reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn with_profile_score(mut self, score: f64) -> Self {
        self.profile_score = Some(score).filter(|score| score.is_finite());
        self
    }

    pub fn with_listed_value_per_dollar(mut self, vpd: f64) -> Self {
        self.listed_value_per_dollar = Some(vpd).filter(|vpd| vpd.is_finite());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryScore {
    pub score: f64,
    pub rank: Option<u32>,
}

/// A pack after rankings have been merged in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPack {
    #[serde(flatten)]
    pub pack: Pack,
    pub rank_overall: Option<u32>,
    pub value_per_dollar: f64,
    pub category_scores: BTreeMap<String, CategoryScore>,
}

impl EnrichedPack {
    pub fn id(&self) -> &str {
        &self.pack.id
    }

    pub fn name(&self) -> &str {
        &self.pack.name
    }

    pub fn price_amount(&self) -> f64 {
        self.pack.price.amount
    }

    pub fn currency(&self) -> &str {
        &self.pack.price.currency
    }

    pub fn is_reference(&self) -> bool {
        self.pack.is_reference
    }

    pub fn profile_score(&self) -> Option<f64> {
        self.pack.profile_score
    }

    pub fn category_score(&self, category: &str) -> Option<&CategoryScore> {
        self.category_scores.get(category)
    }
}
