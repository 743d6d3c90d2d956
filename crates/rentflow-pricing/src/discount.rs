//! Duration discount selection
//!
//! Exactly one tier applies: the one with the largest threshold the stay
//! reaches, among tiers with a positive percentage. Tiers never stack. A
//! 10-day stay with 3-day 10% and 7-day 15% tiers gets 15%, not 25% and
//! not 10% then 15% compounded.

use rentflow_core::models::{AppliedDiscount, DiscountTier};

/// Select the applicable discount for a stay of `days` billed days
///
/// Returns `None` when no active tier's threshold is reached. Percentages
/// are not assumed to grow with the threshold: a misconfigured table still
/// resolves by threshold alone.
pub fn resolve(days: u32, tiers: &[DiscountTier]) -> Option<AppliedDiscount> {
    tiers
        .iter()
        .filter(|tier| tier.is_active() && days >= tier.threshold.days())
        // percentage only breaks ties between duplicate thresholds
        .max_by_key(|tier| (tier.threshold, tier.percentage))
        .map(|tier| AppliedDiscount {
            percentage: tier.percentage,
            threshold: tier.threshold,
        })
}
