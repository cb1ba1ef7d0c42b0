//! Package generation and ranking

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::normalize::{normalize, raw_signal};
use super::{ScoringConfig, ScoringError};
use crate::cart::QuantityPolicy;
use crate::domain::{
    Category, CategoryBreakdown, Diagnostic, DimensionScore, OptionsCatalog, Package, Ranking, Requirements,
    VendorOption, WeightProfile,
};

/// Score a category at or above this to call it a strength
const STRONG_CATEGORY: f64 = 0.7;

/// One option with its category-level score
struct Candidate<'a> {
    option: &'a VendorOption,
    /// None when the category is excluded
    score: Option<f64>,
    dimensions: Vec<DimensionScore>,
}

/// Scored, trimmed candidates for one required category
struct CategoryPlan<'a> {
    category: Category,
    importance: f64,
    quantity: u32,
    excluded: Option<&'static str>,
    candidates: Vec<Candidate<'a>>,
}

impl CategoryPlan<'_> {
    fn counts(&self) -> bool {
        self.excluded.is_none()
    }
}

/// Ranks packages under a fixed generation limit and quantity policy
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
    quantities: QuantityPolicy,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig, quantities: QuantityPolicy) -> Self {
        Self { config, quantities }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score every combination of one option per required category
    ///
    /// Pure and deterministic. A required category with no candidates, or a
    /// profile that weights nothing, yields an empty ranking with a diagnostic
    /// rather than an error.
    pub fn rank(
        &self,
        catalog: &OptionsCatalog,
        profile: &WeightProfile,
        requirements: &Requirements,
    ) -> Result<Ranking, ScoringError> {
        debug!(options = catalog.len(), "rank: called");
        profile.validate().map_err(ScoringError::InvalidWeights)?;

        let grouped = catalog.by_category();
        let mut plans = Vec::with_capacity(requirements.categories.len());
        for category in &requirements.categories {
            let options = grouped.get(category).cloned().unwrap_or_default();
            if options.is_empty() {
                return Ok(empty(profile, Diagnostic::NoPackagesProducible { category: *category }));
            }
            plans.push(self.plan_category(*category, options, profile, requirements));
        }

        // Importances are scaled by the largest so the sum stays finite
        let peak = plans
            .iter()
            .filter(|p| p.counts())
            .map(|p| p.importance)
            .fold(0.0, f64::max);
        if peak <= 0.0 {
            return Ok(empty(profile, Diagnostic::NoMeaningfulRanking));
        }
        let denominator: f64 = plans.iter().filter(|p| p.counts()).map(|p| p.importance / peak).sum();

        let mut packages: Vec<Package> = combinations(&plans)
            .iter()
            .map(|combo| assemble(&plans, combo, peak, denominator))
            .collect();
        let considered = packages.len();

        if packages.iter().any(|p| p.estimated_cost <= requirements.budget) {
            packages.retain(|p| p.estimated_cost <= requirements.budget);
        } else {
            warn!(budget = %requirements.budget, "rank: no package fits the budget");
            for package in &mut packages {
                package.over_budget = true;
            }
        }

        packages.sort_by(compare_packages);
        packages.truncate(self.config.max_packages.max(1));
        for (idx, package) in packages.iter_mut().enumerate() {
            package.rank = idx + 1;
            package.explanation = explain(package, requirements);
        }

        info!(considered, kept = packages.len(), "Ranked packages");
        Ok(Ranking {
            packages,
            weights_used: profile.clone(),
            diagnostic: None,
            considered,
        })
    }

    fn plan_category<'a>(
        &self,
        category: Category,
        options: Vec<&'a VendorOption>,
        profile: &WeightProfile,
        requirements: &Requirements,
    ) -> CategoryPlan<'a> {
        let importance = profile.importance(category);
        let active = profile.sub_weights(category).active();
        let heaviest = active.iter().map(|(_, w)| *w).fold(0.0, f64::max);
        let active: Vec<_> = active.into_iter().map(|(d, w)| (d, w / heaviest)).collect();
        let excluded = if importance <= 0.0 {
            Some("zero importance")
        } else if active.is_empty() {
            Some("all sub-weights are zero")
        } else {
            None
        };
        debug!(%category, candidates = options.len(), ?excluded, "plan_category: called");

        let mut candidates: Vec<Candidate<'a>> = options
            .iter()
            .map(|&option| Candidate {
                option,
                score: None,
                dimensions: Vec::new(),
            })
            .collect();

        if excluded.is_none() {
            let need = self.quantities.capacity_needed(category, requirements);
            let total: f64 = active.iter().map(|(_, w)| w).sum();
            for (dimension, weight) in &active {
                let raws: Vec<f64> = options.iter().map(|o| raw_signal(o, *dimension, need)).collect();
                let scores = normalize(&raws, dimension.is_inverse());
                for ((candidate, raw), score) in candidates.iter_mut().zip(raws).zip(scores) {
                    candidate.dimensions.push(DimensionScore {
                        dimension: *dimension,
                        raw,
                        score,
                        weight: *weight,
                    });
                }
            }
            for candidate in &mut candidates {
                let weighted: f64 = candidate.dimensions.iter().map(|d| d.weight * d.score).sum();
                candidate.score = Some((weighted / total).clamp(0.0, 1.0));
            }
        }

        candidates.sort_by(|a, b| {
            b.score
                .unwrap_or(0.0)
                .total_cmp(&a.score.unwrap_or(0.0))
                .then_with(|| a.option.unit_price.cmp(&b.option.unit_price))
                .then_with(|| a.option.option_id.cmp(&b.option.option_id))
        });
        self.trim(&mut candidates);

        CategoryPlan {
            category,
            importance,
            quantity: self.quantities.quantity_for(category, requirements),
            excluded,
            candidates,
        }
    }
}

impl ScoringEngine {
    /// Keep the best-scored candidates plus the cheapest one
    ///
    /// The cheapest package combines the cheapest option of every category,
    /// so keeping those guarantees a package within budget survives whenever
    /// one exists.
    fn trim(&self, candidates: &mut Vec<Candidate<'_>>) {
        let keep = self.config.max_options_per_category.max(1);
        let cheapest = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.option.unit_price.cmp(&b.option.unit_price))
            .map(|(idx, _)| idx);

        match cheapest {
            Some(idx) if idx >= keep => {
                let cheap = candidates.remove(idx);
                debug!(option_id = %cheap.option.option_id, "trim: kept cheapest beyond the limit");
                candidates.truncate(keep);
                candidates.push(cheap);
            }
            _ => candidates.truncate(keep),
        }
    }
}

fn empty(profile: &WeightProfile, diagnostic: Diagnostic) -> Ranking {
    warn!(%diagnostic, "rank: no packages");
    Ranking {
        packages: Vec::new(),
        weights_used: profile.clone(),
        diagnostic: Some(diagnostic),
        considered: 0,
    }
}

/// Index vectors for the cartesian product of the plans' candidates
fn combinations(plans: &[CategoryPlan<'_>]) -> Vec<Vec<usize>> {
    let mut combos: Vec<Vec<usize>> = vec![Vec::new()];
    for plan in plans {
        combos = combos
            .into_iter()
            .flat_map(|prefix| {
                (0..plan.candidates.len()).map(move |idx| {
                    let mut next = prefix.clone();
                    next.push(idx);
                    next
                })
            })
            .collect();
    }
    combos
}

fn assemble(plans: &[CategoryPlan<'_>], combo: &[usize], peak: f64, denominator: f64) -> Package {
    let mut score = 0.0;
    let mut estimated_cost = Decimal::ZERO;
    let mut selections = BTreeMap::new();
    let mut breakdown = Vec::with_capacity(plans.len());

    for (plan, idx) in plans.iter().zip(combo) {
        let candidate = &plan.candidates[*idx];
        let contribution = match (plan.counts(), candidate.score) {
            (true, Some(s)) => plan.importance / peak * s / denominator,
            _ => 0.0,
        };
        score += contribution;
        // Saturated costs exceed any budget
        estimated_cost = estimated_cost
            .saturating_add(candidate.option.unit_price.saturating_mul(Decimal::from(plan.quantity)));
        selections.insert(plan.category, candidate.option.clone());
        breakdown.push(CategoryBreakdown {
            category: plan.category,
            option_id: candidate.option.option_id.clone(),
            importance: plan.importance,
            score: candidate.score,
            contribution,
            dimensions: candidate.dimensions.clone(),
            excluded: plan.excluded.map(str::to_string),
        });
    }

    Package {
        package_id: Package::id_for(selections.values()),
        rank: 0,
        score: score.clamp(0.0, 1.0),
        selections,
        estimated_cost,
        over_budget: false,
        breakdown,
        explanation: String::new(),
    }
}

/// Score desc, then cost asc, then id asc
fn compare_packages(a: &Package, b: &Package) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.estimated_cost.cmp(&b.estimated_cost))
        .then_with(|| a.package_id.cmp(&b.package_id))
}

fn explain(package: &Package, requirements: &Requirements) -> String {
    let budget = requirements.budget;
    let mut parts = Vec::new();

    if package.over_budget {
        parts.push(format!(
            "Over budget: ${:.2} exceeds ${:.2}.",
            package.estimated_cost, budget
        ));
    } else if budget > Decimal::ZERO {
        let pct = package
            .estimated_cost
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.checked_div(budget));
        match pct {
            Some(pct) => parts.push(format!(
                "Within budget: ${:.2} of ${:.2} ({}%).",
                package.estimated_cost,
                budget,
                pct.round_dp(1)
            )),
            None => parts.push(format!("Within budget: ${:.2} of ${:.2}.", package.estimated_cost, budget)),
        }
    } else {
        parts.push(format!("Within budget at ${:.2}.", package.estimated_cost));
    }

    let mut strong: Vec<&CategoryBreakdown> = package
        .breakdown
        .iter()
        .filter(|b| b.excluded.is_none() && b.score.is_some_and(|s| s >= STRONG_CATEGORY))
        .collect();
    strong.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    if strong.is_empty() {
        parts.push("No standout category.".to_string());
    } else {
        let names: Vec<String> = strong.iter().take(2).map(|b| b.category.to_string()).collect();
        parts.push(format!("Strongest: {}.", names.join(", ")));
    }

    let excluded: Vec<String> = package
        .breakdown
        .iter()
        .filter(|b| b.excluded.is_some())
        .map(|b| b.category.to_string())
        .collect();
    if !excluded.is_empty() {
        parts.push(format!("Not scored: {}.", excluded.join(", ")));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::retreat;
    use crate::domain::{CategoryWeights, Dimension};
    use proptest::prelude::*;

    fn option(id: &str, category: Category, price: i64, rating: f64) -> VendorOption {
        VendorOption::new(id, category, format!("Vendor {}", id), Decimal::from(price)).with_rating(rating)
    }

    fn catalog() -> OptionsCatalog {
        OptionsCatalog::new(vec![
            option("f1", Category::Flights, 300, 4.2).with_signal(Dimension::Timing, 0.9),
            option("f2", Category::Flights, 260, 3.9).with_signal(Dimension::Timing, 0.4),
            option("h1", Category::Hotels, 100, 4.0)
                .with_rooms(30)
                .with_location_score(0.8)
                .with_amenities(["pool"]),
            option("h2", Category::Hotels, 150, 4.8)
                .with_rooms(30)
                .with_location_score(0.8)
                .with_amenities(["pool"]),
            option("m1", Category::MeetingRooms, 2000, 4.5).with_seats(60),
            option("m2", Category::MeetingRooms, 1500, 4.0).with_seats(40),
            option("c1", Category::Catering, 40, 4.6),
            option("c2", Category::Catering, 35, 4.1),
        ])
    }

    fn scenario_profile() -> WeightProfile {
        let mut profile = WeightProfile::default()
            .with_importance(Category::Hotels, 45.0)
            .with_importance(Category::Flights, 25.0)
            .with_importance(Category::MeetingRooms, 15.0)
            .with_importance(Category::Catering, 15.0);
        profile.hotels = CategoryWeights {
            price_weight: 20.0,
            trust_weight: 50.0,
            location_weight: 20.0,
            amenities_weight: 10.0,
            ..Default::default()
        };
        profile
    }

    /// Distinct non-`skip` selections in first-appearance order
    fn projection(ranking: &Ranking, skip: Category) -> Vec<String> {
        let mut seen = Vec::new();
        for package in &ranking.packages {
            let key: Vec<&str> = package
                .selections
                .iter()
                .filter(|(c, _)| **c != skip)
                .map(|(_, o)| o.option_id.as_str())
                .collect();
            let key = key.join("+");
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen
    }

    #[test]
    fn test_higher_trust_hotel_wins_scenario() {
        let ranking = ScoringEngine::default()
            .rank(&catalog(), &scenario_profile(), &retreat())
            .unwrap();

        let top = ranking.top().unwrap();
        assert_eq!(top.selection(Category::Hotels).unwrap().option_id, "h2");
        assert_eq!(top.rank, 1);

        let hotel = top.breakdown.iter().find(|b| b.category == Category::Hotels).unwrap();
        assert!((hotel.score.unwrap() - 0.8).abs() < 1e-9);
        assert!(ranking.diagnostic.is_none());
    }

    #[test]
    fn test_ranking_shape() {
        let ranking = ScoringEngine::default()
            .rank(&catalog(), &WeightProfile::default(), &retreat())
            .unwrap();

        assert_eq!(ranking.considered, 16);
        assert_eq!(ranking.packages.len(), 16);
        for (idx, package) in ranking.packages.iter().enumerate() {
            assert_eq!(package.rank, idx + 1);
            assert_eq!(package.selections.len(), 4);
            assert!(package.package_id.starts_with("pkg:f"));
            assert!(!package.explanation.is_empty());
        }
        for pair in ranking.packages.windows(2) {
            assert_ne!(compare_packages(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let engine = ScoringEngine::default();
        let a = engine.rank(&catalog(), &WeightProfile::default(), &retreat()).unwrap();
        let b = engine.rank(&catalog(), &WeightProfile::default(), &retreat()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_zero_importance_is_meaningless() {
        let profile = Category::ALL
            .iter()
            .fold(WeightProfile::default(), |p, c| p.with_importance(*c, 0.0));
        let ranking = ScoringEngine::default().rank(&catalog(), &profile, &retreat()).unwrap();
        assert!(ranking.is_empty());
        assert_eq!(ranking.diagnostic, Some(Diagnostic::NoMeaningfulRanking));
    }

    #[test]
    fn test_empty_required_category() {
        let mut catalog = catalog();
        catalog.options.retain(|o| o.category != Category::Catering);
        let ranking = ScoringEngine::default()
            .rank(&catalog, &WeightProfile::default(), &retreat())
            .unwrap();
        assert!(ranking.is_empty());
        assert_eq!(
            ranking.diagnostic,
            Some(Diagnostic::NoPackagesProducible {
                category: Category::Catering
            })
        );
    }

    #[test]
    fn test_unrequired_category_ignored() {
        let mut req = retreat();
        req.categories.remove(&Category::Flights);
        let ranking = ScoringEngine::default()
            .rank(&catalog(), &WeightProfile::default(), &req)
            .unwrap();
        assert_eq!(ranking.considered, 8);
        assert!(ranking.packages.iter().all(|p| p.selection(Category::Flights).is_none()));
    }

    #[test]
    fn test_nothing_fits_budget_returns_all_flagged() {
        let mut req = retreat();
        req.budget = Decimal::from(100);
        let ranking = ScoringEngine::default()
            .rank(&catalog(), &WeightProfile::default(), &req)
            .unwrap();
        assert_eq!(ranking.packages.len(), 16);
        assert!(ranking.all_over_budget());
        assert!(ranking.top().unwrap().explanation.starts_with("Over budget"));
    }

    #[test]
    fn test_budget_drops_expensive_packages() {
        // cheapest: f2 13000 + h1 2500 + m2 3000 + c2 3500 = 22000
        let mut req = retreat();
        req.budget = Decimal::from(22000);
        let ranking = ScoringEngine::default()
            .rank(&catalog(), &WeightProfile::default(), &req)
            .unwrap();
        assert_eq!(ranking.packages.len(), 1);
        assert_eq!(ranking.packages[0].package_id, "pkg:f2+h1+m2+c2");
        assert!(!ranking.packages[0].over_budget);
        assert_eq!(ranking.packages[0].estimated_cost, Decimal::from(22000));
    }

    #[test]
    fn test_zero_sub_weights_exclude_category() {
        let mut profile = WeightProfile::default();
        profile.catering = CategoryWeights::default();
        let ranking = ScoringEngine::default().rank(&catalog(), &profile, &retreat()).unwrap();

        let top = ranking.top().unwrap();
        let catering = top.breakdown.iter().find(|b| b.category == Category::Catering).unwrap();
        assert_eq!(catering.score, None);
        assert_eq!(catering.contribution, 0.0);
        assert_eq!(catering.excluded.as_deref(), Some("all sub-weights are zero"));
        assert!(top.explanation.contains("Not scored: catering"));
    }

    #[test]
    fn test_zero_importance_category_does_not_affect_order() {
        let base = WeightProfile::default().with_importance(Category::Catering, 0.0);
        let engine = ScoringEngine::default();
        let first = engine.rank(&catalog(), &base, &retreat()).unwrap();

        let mut reweighted = base.clone();
        reweighted.catering = CategoryWeights {
            price_weight: 90.0,
            dietary_weight: 10.0,
            ..Default::default()
        };
        let second = engine.rank(&catalog(), &reweighted, &retreat()).unwrap();
        let ids = |r: &Ranking| r.packages.iter().map(|p| p.package_id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));

        let mut swapped = catalog();
        swapped.options.retain(|o| o.category != Category::Catering);
        swapped.options.push(option("c9", Category::Catering, 80, 1.0));
        swapped.options.push(option("c8", Category::Catering, 20, 5.0));
        let third = engine.rank(&swapped, &base, &retreat()).unwrap();
        assert_eq!(
            projection(&first, Category::Catering),
            projection(&third, Category::Catering)
        );
    }

    #[test]
    fn test_generation_is_bounded() {
        let mut options = Vec::new();
        for category in Category::ALL {
            for i in 0..5 {
                options.push(option(
                    &format!("{}-{}", category, i),
                    category,
                    10 + i,
                    3.0 + i as f64 * 0.25,
                ));
            }
        }
        let engine = ScoringEngine::new(
            ScoringConfig {
                max_options_per_category: 2,
                max_packages: 10,
            },
            QuantityPolicy::default(),
        );
        let ranking = engine
            .rank(&OptionsCatalog::new(options), &WeightProfile::default(), &retreat())
            .unwrap();
        // hotels favor the pricier options, so their cheapest rides along: 2 x 3 x 2 x 2
        assert_eq!(ranking.considered, 24);
        assert_eq!(ranking.packages.len(), 10);
    }

    fn hotels_only() -> Requirements {
        let mut req = retreat();
        req.categories = [Category::Hotels].into_iter().collect();
        req
    }

    fn trust_only() -> WeightProfile {
        let mut profile = WeightProfile::default();
        profile.hotels = CategoryWeights {
            trust_weight: 1.0,
            ..Default::default()
        };
        profile
    }

    fn ids(ranking: &Ranking) -> Vec<&str> {
        ranking.packages.iter().map(|p| p.package_id.as_str()).collect()
    }

    #[test]
    fn test_cheapest_option_survives_trimming() {
        // 25 room-nights: only the cheap hotel fits a 1000 budget
        let mut options: Vec<VendorOption> = (0..8)
            .map(|i| option(&format!("lux{}", i), Category::Hotels, 200 + 10 * i, 4.0 + 0.1 * i as f64))
            .collect();
        options.push(option("cheap", Category::Hotels, 10, 1.0));
        let mut req = hotels_only();
        req.budget = Decimal::from(1000);

        let ranking = ScoringEngine::default()
            .rank(&OptionsCatalog::new(options), &trust_only(), &req)
            .unwrap();
        assert_eq!(ranking.considered, 9);
        assert_eq!(ids(&ranking), vec!["pkg:cheap"]);
        assert!(!ranking.all_over_budget());
        assert_eq!(ranking.packages[0].estimated_cost, Decimal::from(250));
    }

    #[test]
    fn test_equal_scores_rank_cheaper_first() {
        let catalog = OptionsCatalog::new(vec![
            option("ha", Category::Hotels, 120, 4.0),
            option("hz", Category::Hotels, 100, 4.0),
        ]);
        let ranking = ScoringEngine::default()
            .rank(&catalog, &trust_only(), &hotels_only())
            .unwrap();
        assert_eq!(ranking.packages[0].score, ranking.packages[1].score);
        assert_eq!(ids(&ranking), vec!["pkg:hz", "pkg:ha"]);
    }

    #[test]
    fn test_equal_scores_and_cost_rank_by_id() {
        let catalog = OptionsCatalog::new(vec![
            option("hb", Category::Hotels, 100, 4.0),
            option("ha", Category::Hotels, 100, 4.0),
        ]);
        let ranking = ScoringEngine::default()
            .rank(&catalog, &trust_only(), &hotels_only())
            .unwrap();
        assert_eq!(ids(&ranking), vec!["pkg:ha", "pkg:hb"]);
        assert_eq!(ranking.packages[0].rank, 1);
    }

    #[test]
    fn test_huge_weights_still_discriminate() {
        let mut profile = WeightProfile::default();
        profile.hotels = CategoryWeights {
            trust_weight: 1e308,
            price_weight: 5e307,
            ..Default::default()
        };
        let catalog = OptionsCatalog::new(vec![
            option("h1", Category::Hotels, 100, 4.0),
            option("h2", Category::Hotels, 150, 4.8),
        ]);
        let ranking = ScoringEngine::default()
            .rank(&catalog, &profile, &hotels_only())
            .unwrap();
        assert_eq!(ids(&ranking), vec!["pkg:h2", "pkg:h1"]);
        assert!((ranking.packages[0].score - 2.0 / 3.0).abs() < 1e-9);
        assert!((ranking.packages[1].score - 1.0 / 3.0).abs() < 1e-9);

        let profile = Category::ALL
            .iter()
            .fold(WeightProfile::default(), |p, c| p.with_importance(*c, f64::MAX));
        let ranking = ScoringEngine::default().rank(&self::catalog(), &profile, &retreat()).unwrap();
        let top = ranking.top().unwrap();
        assert!(top.score > 0.0 && top.score <= 1.0);
        assert!(top.score > ranking.packages.last().unwrap().score);
    }

    #[test]
    fn test_oversized_request_does_not_overflow() {
        let mut req = retreat();
        req.attendees = 3_000_000_000;
        let ranking = ScoringEngine::default()
            .rank(&catalog(), &WeightProfile::default(), &req)
            .unwrap();
        assert_eq!(ranking.packages.len(), 16);
        assert!(ranking.all_over_budget());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let profile = WeightProfile::default().with_importance(Category::Hotels, f64::INFINITY);
        let err = ScoringEngine::default().rank(&catalog(), &profile, &retreat()).unwrap_err();
        let ScoringError::InvalidWeights(v) = err;
        assert_eq!(v.field, "category_importance.hotels");
    }

    proptest! {
        #[test]
        fn prop_scores_stay_in_unit_interval(
            prices in prop::collection::vec(1i64..5000, 4..12),
            ratings in prop::collection::vec(0.0f64..=5.0, 12),
            importance in prop::collection::vec(0.0f64..1000.0, 4),
            price_weight in 0.0f64..100.0,
        ) {
            let options: Vec<VendorOption> = prices
                .iter()
                .enumerate()
                .map(|(i, p)| option(&format!("o{}", i), Category::ALL[i % 4], *p, ratings[i]))
                .collect();
            let mut profile = WeightProfile::default();
            for (category, weight) in Category::ALL.iter().zip(&importance) {
                profile = profile.with_importance(*category, *weight);
            }
            profile.hotels.price_weight = price_weight;

            let ranking = ScoringEngine::default()
                .rank(&OptionsCatalog::new(options), &profile, &retreat())
                .unwrap();
            for package in &ranking.packages {
                prop_assert!((0.0..=1.0).contains(&package.score));
            }
        }
    }
}
