use crate::model::EnrichedPack;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    RankOverall,
    ValuePerDollar,
    Price,
}

impl SortField {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rank_overall" | "rank" => Some(SortField::RankOverall),
            "value_per_dollar" | "vpd" => Some(SortField::ValuePerDollar),
            "price" => Some(SortField::Price),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SortField::RankOverall => "rank_overall",
            SortField::ValuePerDollar => "value_per_dollar",
            SortField::Price => "price",
        }
    }

    fn key(self, pack: &EnrichedPack) -> f64 {
        match self {
            // Unranked packs sort as the worst possible rank.
            SortField::RankOverall => pack
                .rank_overall
                .map(f64::from)
                .unwrap_or(f64::INFINITY),
            SortField::ValuePerDollar => pack.value_per_dollar,
            SortField::Price => pack.price_amount(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `"asc"` sorts ascending; any other label sorts descending.
    pub fn from_label(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Declarative list view state. Replaced wholesale on every user change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub search: String,
    pub exclude_reference: bool,
    pub focus_category: Option<String>,
    pub sort_field: SortField,
    pub sort_dir: SortDirection,
    pub top_n: usize,
    pub top_toggle: bool,
}

impl FilterSpec {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn excluding_reference(mut self) -> Self {
        self.exclude_reference = true;
        self
    }

    pub fn focus(mut self, category: impl Into<String>) -> Self {
        self.focus_category = Some(category.into());
        self
    }

    pub fn sorted_by(mut self, field: SortField, dir: SortDirection) -> Self {
        self.sort_field = field;
        self.sort_dir = dir;
        self
    }

    pub fn top(mut self, n: usize) -> Self {
        self.top_n = n;
        self.top_toggle = true;
        self
    }
}

/// Filter, sort and truncate `packs` into display order.
///
/// Sorting is stable, so packs with equal keys keep their input order in
/// either direction.
pub fn apply_filters(packs: &[EnrichedPack], spec: &FilterSpec) -> Vec<EnrichedPack> {
    let term = spec.search.to_lowercase();
    let focus = spec.focus_category.as_deref().filter(|c| !c.is_empty());

    let mut result: Vec<EnrichedPack> = packs
        .iter()
        .filter(|pack| term.is_empty() || pack.name().to_lowercase().contains(&term))
        .filter(|pack| !(spec.exclude_reference && pack.is_reference()))
        .filter(|pack| focus.is_none_or(|category| pack.category_scores.contains_key(category)))
        .cloned()
        .collect();

    let field = spec.sort_field;
    result.sort_by(|a, b| {
        let ordering = field
            .key(a)
            .partial_cmp(&field.key(b))
            .unwrap_or(Ordering::Equal);
        match spec.sort_dir {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    if spec.top_toggle {
        result.truncate(spec.top_n);
    }

    result
}
