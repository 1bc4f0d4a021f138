// src/engine/projection.rs

use super::round2;
use crate::models::CommissionTier;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievedTier {
    pub threshold: Decimal,
    /// Rate applied to the whole current revenue, rounded up.
    pub bonus: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextTier {
    pub threshold: Decimal,
    pub shortfall: Decimal,
    /// What landing exactly on the threshold would pay, rounded up.
    pub bonus: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusProjection {
    pub min_target: Decimal,
    pub target_percent: Option<Decimal>,
    pub achieved: Option<AchievedTier>,
    pub next: Option<NextTier>,
}

/// Project the tiered bonus for a cumulative revenue.
///
/// Tiers are sorted ascending by threshold here; the caller's order is only used
/// to break ties, where the first of equal thresholds wins.
pub fn project(current_revenue: Decimal, tiers: &[CommissionTier]) -> BonusProjection {
    let mut sorted = tiers.to_vec();
    sorted.sort_by(|a, b| a.threshold_amount.cmp(&b.threshold_amount));

    let min_target = sorted.first().map_or(Decimal::ZERO, |tier| tier.threshold_amount);
    let target_percent = (!min_target.is_zero()).then(|| round2(current_revenue * dec!(100) / min_target));

    let mut achieved: Option<AchievedTier> = None;
    let mut next: Option<NextTier> = None;

    for tier in &sorted {
        if current_revenue >= tier.threshold_amount {
            if achieved.is_none_or(|a| tier.threshold_amount > a.threshold) {
                achieved = Some(AchievedTier {
                    threshold: tier.threshold_amount,
                    bonus: (tier.bonus_rate * current_revenue / dec!(100)).ceil(),
                });
            }
        } else if next.is_none() {
            next = Some(NextTier {
                threshold: tier.threshold_amount,
                shortfall: tier.threshold_amount - current_revenue,
                bonus: (tier.bonus_rate * tier.threshold_amount / dec!(100)).ceil(),
            });
        }
    }

    BonusProjection {
        min_target,
        target_percent,
        achieved,
        next,
    }
}
