use crate::model::EnrichedPack;
use serde::Serialize;
use std::collections::VecDeque;

pub const DEFAULT_COMPARE_LIMIT: usize = 3;
pub const MIN_COMPARE: usize = 2;
const MAX_HIGHLIGHTS: usize = 3;

/// Bounded, insertion-ordered selection of pack ids.
///
/// Selecting past capacity evicts the oldest id. Re-selecting an id that is
/// already present moves it to the newest position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonSet {
    ids: VecDeque<String>,
    #[serde(skip)]
    capacity: usize,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_COMPARE_LIMIT)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ids: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Return the selection after toggling `id`.
    pub fn update(&self, id: &str, select: bool) -> Self {
        let mut next = self.clone();
        next.ids.retain(|existing| existing != id);
        if select {
            if next.ids.len() >= next.capacity {
                next.ids.pop_front();
            }
            next.ids.push_back(id.to_string());
        }
        next
    }

    pub fn select(&self, id: &str) -> Self {
        self.update(id, true)
    }

    pub fn deselect(&self, id: &str) -> Self {
        self.update(id, false)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_compare(&self) -> bool {
        self.ids.len() >= MIN_COMPARE
    }
}

impl Default for ComparisonSet {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryHighlight {
    pub category: String,
    pub rank: Option<u32>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub total_value: f64,
    pub value_per_dollar: f64,
    pub profile_score: Option<f64>,
    pub rank_overall: Option<u32>,
    pub highlights: Vec<CategoryHighlight>,
}

impl ComparisonRow {
    fn from_pack(pack: &EnrichedPack) -> Self {
        Self {
            id: pack.id().to_string(),
            name: pack.name().to_string(),
            price: pack.price_amount(),
            currency: pack.currency().to_string(),
            total_value: pack.pack.value,
            value_per_dollar: pack.value_per_dollar,
            profile_score: pack.profile_score(),
            rank_overall: pack.rank_overall,
            highlights: pack
                .category_scores
                .iter()
                .take(MAX_HIGHLIGHTS)
                .map(|(category, score)| CategoryHighlight {
                    category: category.clone(),
                    rank: score.rank,
                    score: score.score,
                })
                .collect(),
        }
    }
}

/// Side-by-side view of the selected packs, in selection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
    pub has_profile_score: bool,
}

impl Comparison {
    /// `None` unless at least two selected ids resolve to packs.
    pub fn build(selection: &ComparisonSet, packs: &[EnrichedPack]) -> Option<Self> {
        let rows: Vec<ComparisonRow> = selection
            .ids()
            .filter_map(|id| packs.iter().find(|pack| pack.id() == id))
            .map(ComparisonRow::from_pack)
            .collect();
        if rows.len() < MIN_COMPARE {
            return None;
        }
        let has_profile_score = rows.iter().any(|row| row.profile_score.is_some());
        Some(Self {
            rows,
            has_profile_score,
        })
    }
}
