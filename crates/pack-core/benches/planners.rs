use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use pack_core::model::{
    CatalogItem, CategoryRankingEntry, EnrichedPack, Item, OverallRankingEntry, Pack, Price,
    RankingByCategory,
};
use pack_core::planner::{BudgetRequest, GoalRequest, plan_budget, plan_goal};
use pack_core::{FilterSpec, SortDirection, SortField, apply_filters, merge_rankings};

fn synthetic(count: usize) -> (Vec<Pack>, Vec<OverallRankingEntry>, RankingByCategory) {
    let mut packs = Vec::with_capacity(count);
    let mut overall = Vec::with_capacity(count);
    let mut shards = Vec::new();
    for idx in 0..count {
        let price = 0.99 + (idx % 50) as f64;
        let value = 10.0 + ((idx * 37) % 900) as f64;
        let id = format!("pack-{idx}");
        packs.push(
            Pack::new(id.clone(), format!("Pack {idx}"), Price::new(price, "USD"), value)
                .with_items(vec![Item::new("Hero Shard", (idx % 7) as f64)]),
        );
        overall.push(OverallRankingEntry::new(id.clone(), idx as u32 + 1, value / price));
        if idx % 3 == 0 {
            shards.push(CategoryRankingEntry::new(id, value, shards.len() as u32 + 1));
        }
    }
    let mut by_category = RankingByCategory::new();
    by_category.insert("shards".into(), shards);
    (packs, overall, by_category)
}

fn enriched(count: usize) -> Vec<EnrichedPack> {
    let (packs, overall, by_category) = synthetic(count);
    merge_rankings(&packs, &overall, &by_category)
}

fn bench_merge(c: &mut Criterion) {
    let (packs, overall, by_category) = synthetic(2_000);
    c.bench_function("merge_rankings_2000", |b| {
        b.iter(|| black_box(merge_rankings(&packs, &overall, &by_category)))
    });
}

fn bench_filters(c: &mut Criterion) {
    let packs = enriched(2_000);
    let spec = FilterSpec::default()
        .with_search("pack 1")
        .focus("shards")
        .sorted_by(SortField::ValuePerDollar, SortDirection::Desc)
        .top(25);
    c.bench_function("apply_filters_2000", |b| {
        b.iter(|| black_box(apply_filters(&packs, &spec)))
    });
}

fn bench_planners(c: &mut Criterion) {
    let mut group = c.benchmark_group("planners");
    let packs = enriched(2_000);
    let items = vec![CatalogItem::named("Hero Shard")];

    for budget in [50.0, 500.0, 5_000.0] {
        group.bench_function(format!("budget_{budget}"), |b| {
            b.iter_batched(
                || BudgetRequest::new(budget),
                |request| black_box(plan_budget(&packs, &request)),
                BatchSize::SmallInput,
            )
        });
    }
    group.bench_function("goal_shards_100", |b| {
        b.iter_batched(
            || GoalRequest::new("shard", 100.0),
            |request| black_box(plan_goal(&packs, &items, &request)),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_merge, bench_filters, bench_planners);
criterion_main!(benches);
