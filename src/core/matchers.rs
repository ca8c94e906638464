//! Matching strategies for open-item reconciliation
//!
//! Each GL account is matched by exactly one strategy, selected from the
//! account's ordered criterion list. The strategies share a common
//! contract: they receive one account's items (already globally sorted by
//! the engine) and annotate the `matched`/`processed`/`excluded`/`message`
//! status fields in place.
//!
//! # Strategy priority
//!
//! When an account's rule names several criteria, the first applicable
//! strategy wins, in this order:
//!
//! 1. Oldest-assignment pairing
//! 2. Cumulative-sum prefix matching
//! 3. Deal-number grouping
//! 4. Trading-partner-restricted amount sums
//! 5. General criteria cascade (also the second half of 4)
//!
//! All zero-sum tests round the summed amount to 2 decimal places and
//! require exact equality to zero.

use crate::types::{ClearingError, Criterion, LedgerItem};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Entity whose deal-number matches are filtered by deal prefix
const DEAL_PREFIX_ENTITY: &str = "499L";

/// Deal-number prefix that is allowed to clear for [`DEAL_PREFIX_ENTITY`]
const CLEARABLE_DEAL_PREFIX: &str = "60";

/// Message written to matched items held back by the deal-prefix filter
const DEAL_EXCLUSION_MESSAGE: &str = "Excluded from clearing based on deal number criteria.";

/// Grouping key used by the general criteria cascade
///
/// Each key reads one free-form identifier column of the item; grouping
/// is always by (currency, key value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeKey {
    Assignment,
    DocumentNumber,
    Reference,
    Text,
    TradingPartner,
}

impl CascadeKey {
    /// The cascade key for a criterion, if the criterion is a groupable
    /// column rather than a strategy selector
    fn from_criterion(criterion: &Criterion) -> Option<CascadeKey> {
        match criterion {
            Criterion::Assignment => Some(CascadeKey::Assignment),
            Criterion::DocumentNumber => Some(CascadeKey::DocumentNumber),
            Criterion::Reference => Some(CascadeKey::Reference),
            Criterion::Text => Some(CascadeKey::Text),
            Criterion::TradingPartner(_) => Some(CascadeKey::TradingPartner),
            _ => None,
        }
    }

    /// The item column this key groups by
    fn value<'a>(&self, item: &'a LedgerItem) -> &'a str {
        match self {
            CascadeKey::Assignment => &item.assignment,
            CascadeKey::DocumentNumber => &item.document_number,
            CascadeKey::Reference => &item.reference,
            CascadeKey::Text => &item.text,
            CascadeKey::TradingPartner => &item.trading_partner,
        }
    }
}

/// The matching strategy chosen for one account
#[derive(Debug, Clone, PartialEq)]
pub enum MatchStrategy {
    /// Pair duplicated amounts within an assignment, oldest documents first
    OldestAssignment,

    /// Match the value-date-ordered prefix through the last zero crossing
    /// of the running amount sum
    CumulativeSum,

    /// Match (currency, deal number) groups that sum to zero
    DealNumber,

    /// Zero-sum matching by currency, absolute amount and cascade keys,
    /// optionally restricted to a trading-partner id set
    AmountSum {
        /// Candidate filter; empty means the whole account participates
        partners: Vec<String>,
        /// Additional grouping keys, in rule order
        cascade: Vec<CascadeKey>,
    },
}

impl MatchStrategy {
    /// Select the strategy for an account from its decoded criteria
    ///
    /// The priority order is fixed (see module docs); the cascade keys of
    /// the fallback strategy preserve the rule's criterion order.
    pub fn from_criteria(criteria: &[Criterion]) -> MatchStrategy {
        if criteria.contains(&Criterion::OldestAssignment) {
            return MatchStrategy::OldestAssignment;
        }
        if criteria.contains(&Criterion::CumulativeSum) {
            return MatchStrategy::CumulativeSum;
        }
        if criteria.contains(&Criterion::DealNumber) {
            return MatchStrategy::DealNumber;
        }

        let partners = criteria
            .iter()
            .find_map(|c| match c {
                Criterion::TradingPartner(values) => Some(values.clone()),
                _ => None,
            })
            .unwrap_or_default();

        let cascade = criteria.iter().filter_map(CascadeKey::from_criterion).collect();

        MatchStrategy::AmountSum { partners, cascade }
    }

    /// Run the strategy over one account's items
    ///
    /// Annotates the status fields in place. The slice must contain the
    /// complete subset for one account.
    ///
    /// # Errors
    ///
    /// Returns an `EmptyInput` error for an empty subset; an empty
    /// account subset reaching a matcher indicates an upstream filtering
    /// bug and must not be silently accepted.
    pub fn apply(&self, items: &mut [LedgerItem], entity: &str) -> Result<(), ClearingError> {
        if items.is_empty() {
            return Err(ClearingError::EmptyInput { scope: None });
        }

        match self {
            MatchStrategy::OldestAssignment => match_oldest_assignment(items),
            MatchStrategy::CumulativeSum => match_cumulative_sum(items),
            MatchStrategy::DealNumber => match_deal_number(items, entity),
            MatchStrategy::AmountSum { partners, cascade } => {
                match_amount_sum(items, partners, cascade)
            }
        }

        Ok(())
    }
}

/// Compare optional dates, ordering missing dates after all present ones
pub(crate) fn cmp_dates_missing_last(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Whether the amounts sum to zero after rounding to 2 decimal places
fn sums_to_zero<'a>(amounts: impl IntoIterator<Item = &'a Decimal>) -> bool {
    amounts
        .into_iter()
        .copied()
        .sum::<Decimal>()
        .round_dp(2)
        .is_zero()
}

/// Bin item indexes by a composite key, preserving first-appearance order
///
/// The explicit ordered binning keeps tie-breaks deterministic: bins come
/// out in the order their keys first occur in the (sorted) table.
fn group_indexes<K, F>(indexes: impl Iterator<Item = usize>, key: F) -> Vec<(K, Vec<usize>)>
where
    K: Eq + std::hash::Hash + Clone,
    F: Fn(usize) -> K,
{
    let mut order: Vec<K> = Vec::new();
    let mut bins: HashMap<K, Vec<usize>> = HashMap::new();

    for i in indexes {
        let k = key(i);
        if !bins.contains_key(&k) {
            order.push(k.clone());
        }
        bins.entry(k).or_default().push(i);
    }

    order
        .into_iter()
        .map(|k| {
            let bin = bins.remove(&k).unwrap_or_default();
            (k, bin)
        })
        .collect()
}

/// The `count` oldest candidates by document date, missing dates last,
/// ties broken by candidate (table) order
fn oldest_by_document_date(
    items: &[LedgerItem],
    candidates: &[usize],
    count: usize,
) -> Vec<usize> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|&a, &b| cmp_dates_missing_last(items[a].document_date, items[b].document_date));
    sorted.truncate(count);
    sorted
}

/// Oldest-assignment strategy
///
/// Phase 1 matches whole (currency, absolute amount, assignment) groups
/// that sum to zero. Phase 2 pairs the remaining duplicated magnitudes:
/// for each (absolute amount, assignment) pair with both signs present,
/// the `min(#positive, #negative)` oldest-dated items of each sign are
/// matched; whatever is left on either side is processed but unmatched,
/// with no further attempt. Magnitudes that never recur are left alone.
fn match_oldest_assignment(items: &mut [LedgerItem]) {
    let groups = group_indexes(0..items.len(), |i| {
        (
            items[i].currency.clone(),
            items[i].amount_abs,
            items[i].assignment.clone(),
        )
    });

    for (_, bin) in &groups {
        if sums_to_zero(bin.iter().map(|&i| &items[i].amount)) {
            for &i in bin {
                items[i].mark_matched();
            }
        }
    }

    let currencies: Vec<String> = {
        let mut seen = HashSet::new();
        (0..items.len())
            .filter(|&i| !items[i].processed)
            .map(|i| items[i].currency.clone())
            .filter(|c| seen.insert(c.clone()))
            .collect()
    };

    for currency in currencies {
        let curr_idx: Vec<usize> = (0..items.len())
            .filter(|&i| !items[i].processed && items[i].currency == currency)
            .collect();

        // candidate pairs: magnitudes that recur within the currency subset
        let mut seen_abs: HashSet<Decimal> = HashSet::new();
        let mut pair_seen: HashSet<(Decimal, String)> = HashSet::new();
        let mut pairs: Vec<(Decimal, String)> = Vec::new();
        for &i in &curr_idx {
            if !seen_abs.insert(items[i].amount_abs) {
                let pair = (items[i].amount_abs, items[i].assignment.clone());
                if pair_seen.insert(pair.clone()) {
                    pairs.push(pair);
                }
            }
        }

        for (amount, assignment) in pairs {
            let positive: Vec<usize> = curr_idx
                .iter()
                .copied()
                .filter(|&i| items[i].amount == amount && items[i].assignment == assignment)
                .collect();
            let negative: Vec<usize> = curr_idx
                .iter()
                .copied()
                .filter(|&i| items[i].amount == -amount && items[i].assignment == assignment)
                .collect();

            let take = positive.len().min(negative.len());

            if take == 0 {
                // one-sided magnitude, nothing can ever pair up
                for &i in positive.iter().chain(negative.iter()) {
                    items[i].processed = true;
                }
                continue;
            }

            for side in [&positive, &negative] {
                for &i in &oldest_by_document_date(items, side, take) {
                    items[i].mark_matched();
                }
                // the surplus of the longer side gets no further attempt
                for &i in side.iter() {
                    items[i].processed = true;
                }
            }
        }
    }
}

/// Cumulative-sum strategy
///
/// Orders the account's items by value date (stable, missing dates last)
/// and marks everything up to and including the last position where the
/// running signed sum rounds to zero. Once a zero crossing occurs the
/// whole prefix nets out, even if intermediate partial sums were nonzero.
fn match_cumulative_sum(items: &mut [LedgerItem]) {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| cmp_dates_missing_last(items[a].value_date, items[b].value_date));

    let mut running = Decimal::ZERO;
    let mut last_zero: Option<usize> = None;
    for (pos, &i) in order.iter().enumerate() {
        running += items[i].amount;
        if running.round_dp(2).is_zero() {
            last_zero = Some(pos);
        }
    }

    if let Some(pos) = last_zero {
        for &i in &order[..=pos] {
            items[i].mark_matched();
        }
    }
}

/// Deal-number strategy
///
/// Matches (currency, deal number) groups that sum to zero among items
/// carrying a deal number. For the designated entity, matched items whose
/// deal number lies outside the clearable prefix are additionally
/// excluded: they stay matched but never reach the clearing input.
fn match_deal_number(items: &mut [LedgerItem], entity: &str) {
    let with_deal: Vec<usize> = (0..items.len())
        .filter(|&i| items[i].deal_number.is_some())
        .collect();

    let groups = group_indexes(with_deal.into_iter(), |i| {
        (
            items[i].currency.clone(),
            items[i].deal_number.clone().unwrap_or_default(),
        )
    });

    for (_, bin) in &groups {
        if sums_to_zero(bin.iter().map(|&i| &items[i].amount)) {
            for &i in bin {
                items[i].mark_matched();
            }
        }
    }

    if entity == DEAL_PREFIX_ENTITY {
        for item in items.iter_mut() {
            let outside_prefix = item
                .deal_number
                .as_deref()
                .is_some_and(|deal| !deal.starts_with(CLEARABLE_DEAL_PREFIX));
            if item.matched && outside_prefix {
                item.excluded = true;
                item.message = DEAL_EXCLUSION_MESSAGE.to_string();
            }
        }
    }
}

/// Amount-sum strategy with the general criteria cascade
///
/// Candidates are the whole account, or the subset with one of the given
/// trading-partner ids when `partners` is non-empty (the rest of the
/// account stays unmatched). The cascade then attempts, in order: whole
/// (currency) zero sums, (currency, absolute amount) groups, and one pass
/// per configured cascade key over whatever the previous steps left
/// unprocessed.
fn match_amount_sum(items: &mut [LedgerItem], partners: &[String], cascade: &[CascadeKey]) {
    let scope: Vec<usize> = (0..items.len())
        .filter(|&i| partners.is_empty() || partners.iter().any(|p| *p == items[i].trading_partner))
        .collect();

    let groups = group_indexes(scope.iter().copied(), |i| items[i].currency.clone());
    for (_, bin) in &groups {
        if sums_to_zero(bin.iter().map(|&i| &items[i].amount)) {
            for &i in bin {
                items[i].mark_matched();
            }
        }
    }

    // entire candidate set settled in one pass
    if scope.iter().all(|&i| items[i].processed) {
        return;
    }

    let remaining: Vec<usize> = scope
        .iter()
        .copied()
        .filter(|&i| !items[i].processed)
        .collect();
    let groups = group_indexes(remaining.into_iter(), |i| {
        (items[i].currency.clone(), items[i].amount_abs)
    });
    for (_, bin) in &groups {
        if sums_to_zero(bin.iter().map(|&i| &items[i].amount)) {
            for &i in bin {
                items[i].mark_matched();
            }
        }
    }

    for key in cascade {
        let remaining: Vec<usize> = scope
            .iter()
            .copied()
            .filter(|&i| !items[i].processed)
            .collect();
        let groups = group_indexes(remaining.into_iter(), |i| {
            (items[i].currency.clone(), key.value(&items[i]).to_string())
        });
        for (_, bin) in &groups {
            if sums_to_zero(bin.iter().map(|&i| &items[i].amount)) {
                for &i in bin {
                    items[i].mark_matched();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 1, d)
    }

    fn item(amount: i64) -> LedgerItem {
        let amount = Decimal::new(amount, 2);
        LedgerItem {
            entity: "0001".to_string(),
            account: "10000000".to_string(),
            currency: "EUR".to_string(),
            amount,
            amount_abs: amount.abs(),
            document_number: "4900000001".to_string(),
            document_type: "SA".to_string(),
            document_date: date(1),
            posting_date: date(1),
            value_date: date(1),
            assignment: "A1".to_string(),
            reference: String::new(),
            trading_partner: String::new(),
            text: String::new(),
            deal_number: None,
            posting_number: None,
            matched: false,
            processed: false,
            excluded: false,
            message: String::new(),
        }
    }

    fn assert_invariants(items: &[LedgerItem]) {
        for it in items {
            assert!(!it.matched || it.processed, "matched item must be processed");
            assert!(!it.excluded || it.matched, "excluded item must be matched");
        }
    }

    fn matched_flags(items: &[LedgerItem]) -> Vec<bool> {
        items.iter().map(|it| it.matched).collect()
    }

    // --- strategy selection ---

    #[rstest]
    #[case::oldest_wins_over_everything(
        vec![Criterion::CumulativeSum, Criterion::OldestAssignment, Criterion::DealNumber],
        MatchStrategy::OldestAssignment
    )]
    #[case::cumulative_before_deal(
        vec![Criterion::DealNumber, Criterion::CumulativeSum],
        MatchStrategy::CumulativeSum
    )]
    #[case::deal_before_partner(
        vec![Criterion::TradingPartner(vec!["VND01".to_string()]), Criterion::DealNumber],
        MatchStrategy::DealNumber
    )]
    #[case::partner_keeps_cascade(
        vec![Criterion::TradingPartner(vec!["VND01".to_string()]), Criterion::Reference],
        MatchStrategy::AmountSum {
            partners: vec!["VND01".to_string()],
            cascade: vec![CascadeKey::TradingPartner, CascadeKey::Reference],
        }
    )]
    #[case::general_cascade_in_rule_order(
        vec![Criterion::Assignment, Criterion::Text],
        MatchStrategy::AmountSum {
            partners: vec![],
            cascade: vec![CascadeKey::Assignment, CascadeKey::Text],
        }
    )]
    fn test_strategy_priority(#[case] criteria: Vec<Criterion>, #[case] expected: MatchStrategy) {
        assert_eq!(MatchStrategy::from_criteria(&criteria), expected);
    }

    #[rstest]
    #[case::oldest(MatchStrategy::OldestAssignment)]
    #[case::cumulative(MatchStrategy::CumulativeSum)]
    #[case::deal(MatchStrategy::DealNumber)]
    #[case::amount_sum(MatchStrategy::AmountSum { partners: vec![], cascade: vec![] })]
    fn test_empty_subset_is_an_error(#[case] strategy: MatchStrategy) {
        let mut items: Vec<LedgerItem> = vec![];
        let result = strategy.apply(&mut items, "0001");
        assert!(matches!(result, Err(ClearingError::EmptyInput { .. })));
    }

    // --- oldest assignment ---

    #[test]
    fn test_oldest_assignment_matches_simple_pair() {
        let mut items = vec![item(10000), item(-10000)];

        MatchStrategy::OldestAssignment
            .apply(&mut items, "0001")
            .unwrap();

        assert_eq!(matched_flags(&items), vec![true, true]);
        assert_invariants(&items);
    }

    #[test]
    fn test_oldest_assignment_pairs_oldest_of_majority_side() {
        let mut items = vec![item(10000), item(10000), item(-10000)];
        items[0].document_date = date(5);
        items[1].document_date = date(2); // older duplicate
        items[2].document_date = date(9);

        MatchStrategy::OldestAssignment
            .apply(&mut items, "0001")
            .unwrap();

        assert_eq!(matched_flags(&items), vec![false, true, true]);
        // the unmatched leftover gets no further attempt
        assert!(items[0].processed);
        assert_invariants(&items);
    }

    #[test]
    fn test_oldest_assignment_breaks_date_ties_by_table_order() {
        let mut items = vec![item(10000), item(10000), item(-10000)];
        // identical document dates: the earlier row wins
        items[0].document_date = date(2);
        items[1].document_date = date(2);

        MatchStrategy::OldestAssignment
            .apply(&mut items, "0001")
            .unwrap();

        assert_eq!(matched_flags(&items), vec![true, false, true]);
    }

    #[test]
    fn test_oldest_assignment_ignores_non_recurring_magnitudes() {
        let mut items = vec![item(10000), item(-5000)];

        MatchStrategy::OldestAssignment
            .apply(&mut items, "0001")
            .unwrap();

        assert_eq!(matched_flags(&items), vec![false, false]);
    }

    #[test]
    fn test_oldest_assignment_one_sided_duplicates_are_processed_unmatched() {
        let mut items = vec![item(10000), item(10000)];

        MatchStrategy::OldestAssignment
            .apply(&mut items, "0001")
            .unwrap();

        assert_eq!(matched_flags(&items), vec![false, false]);
        assert!(items.iter().all(|it| it.processed));
    }

    #[test]
    fn test_oldest_assignment_separates_assignments() {
        let mut items = vec![item(10000), item(-10000)];
        items[1].assignment = "B2".to_string();

        MatchStrategy::OldestAssignment
            .apply(&mut items, "0001")
            .unwrap();

        // same magnitude, different assignment: no zero-sum group forms
        assert_eq!(matched_flags(&items), vec![false, false]);
    }

    #[test]
    fn test_oldest_assignment_separates_currencies() {
        let mut items = vec![item(10000), item(-10000)];
        items[1].currency = "USD".to_string();

        MatchStrategy::OldestAssignment
            .apply(&mut items, "0001")
            .unwrap();

        assert_eq!(matched_flags(&items), vec![false, false]);
    }

    // --- cumulative sum ---

    #[test]
    fn test_cumulative_sum_matches_prefix_through_last_zero() {
        // running sums: 10, 0, 5, 0, 3 → last zero at position 3
        let mut items = vec![item(1000), item(-1000), item(500), item(-500), item(300)];
        for (d, it) in items.iter_mut().enumerate() {
            it.value_date = date(d as u32 + 1);
        }

        MatchStrategy::CumulativeSum
            .apply(&mut items, "0001")
            .unwrap();

        assert_eq!(matched_flags(&items), vec![true, true, true, true, false]);
        assert_invariants(&items);
    }

    #[test]
    fn test_cumulative_sum_is_stable_on_value_date_ties() {
        // all on the same value date: insertion order is the tie-break,
        // so the prefix is identical to the previous test
        let mut items = vec![item(1000), item(-1000), item(500), item(-500), item(300)];

        MatchStrategy::CumulativeSum
            .apply(&mut items, "0001")
            .unwrap();

        assert_eq!(matched_flags(&items), vec![true, true, true, true, false]);
    }

    #[test]
    fn test_cumulative_sum_without_zero_crossing_matches_nothing() {
        let mut items = vec![item(1000), item(500)];

        MatchStrategy::CumulativeSum
            .apply(&mut items, "0001")
            .unwrap();

        assert_eq!(matched_flags(&items), vec![false, false]);
    }

    #[test]
    fn test_cumulative_sum_orders_missing_value_dates_last() {
        // the missing-date item would complete the zero sum but sorts last
        let mut items = vec![item(1000), item(300), item(-1000)];
        items[1].value_date = None;
        items[2].value_date = date(2);

        MatchStrategy::CumulativeSum
            .apply(&mut items, "0001")
            .unwrap();

        // order by value date: 10, -10 (zero), then the dateless 3
        assert_eq!(matched_flags(&items), vec![true, false, true]);
    }

    // --- deal number ---

    #[test]
    fn test_deal_number_matches_zero_sum_groups() {
        let mut items = vec![item(5000), item(-5000), item(7000)];
        items[0].deal_number = Some("6012345678901".to_string());
        items[1].deal_number = Some("6012345678901".to_string());
        items[2].deal_number = Some("6099999999999".to_string());

        MatchStrategy::DealNumber.apply(&mut items, "499L").unwrap();

        assert_eq!(matched_flags(&items), vec![true, true, false]);
        assert!(!items[0].excluded);
        assert!(!items[1].excluded);
        assert_invariants(&items);
    }

    #[test]
    fn test_deal_number_excludes_foreign_prefix_for_designated_entity() {
        let mut items = vec![item(5000), item(-5000)];
        items[0].deal_number = Some("5012345678901".to_string());
        items[1].deal_number = Some("5012345678901".to_string());

        MatchStrategy::DealNumber.apply(&mut items, "499L").unwrap();

        for it in &items {
            assert!(it.matched);
            assert!(it.excluded);
            assert_eq!(it.message, DEAL_EXCLUSION_MESSAGE);
        }
        assert_invariants(&items);
    }

    #[test]
    fn test_deal_number_prefix_filter_only_applies_to_designated_entity() {
        let mut items = vec![item(5000), item(-5000)];
        items[0].deal_number = Some("5012345678901".to_string());
        items[1].deal_number = Some("5012345678901".to_string());

        MatchStrategy::DealNumber.apply(&mut items, "0073").unwrap();

        assert!(items.iter().all(|it| it.matched && !it.excluded));
    }

    #[test]
    fn test_deal_number_skips_items_without_deal() {
        let mut items = vec![item(5000), item(-5000)];
        items[0].deal_number = Some("6012345678901".to_string());

        MatchStrategy::DealNumber.apply(&mut items, "499L").unwrap();

        assert_eq!(matched_flags(&items), vec![false, false]);
    }

    // --- amount sum / cascade ---

    #[test]
    fn test_amount_sum_matches_whole_currency_subset() {
        let mut items = vec![item(1000), item(2000), item(-3000)];

        MatchStrategy::AmountSum {
            partners: vec![],
            cascade: vec![],
        }
        .apply(&mut items, "0001")
        .unwrap();

        assert_eq!(matched_flags(&items), vec![true, true, true]);
    }

    #[test]
    fn test_amount_sum_treats_currencies_independently() {
        let mut items = vec![item(1000), item(-1000), item(5000)];
        items[2].currency = "USD".to_string();

        MatchStrategy::AmountSum {
            partners: vec![],
            cascade: vec![],
        }
        .apply(&mut items, "0001")
        .unwrap();

        assert_eq!(matched_flags(&items), vec![true, true, false]);
    }

    #[test]
    fn test_amount_sum_falls_back_to_absolute_amount_groups() {
        // whole currency sums to 7, but the 10/-10 pair nets out
        let mut items = vec![item(1000), item(-1000), item(700)];

        MatchStrategy::AmountSum {
            partners: vec![],
            cascade: vec![],
        }
        .apply(&mut items, "0001")
        .unwrap();

        assert_eq!(matched_flags(&items), vec![true, true, false]);
    }

    #[test]
    fn test_amount_sum_cascade_groups_by_reference() {
        // different magnitudes, same reference: only the reference pass matches
        let mut items = vec![item(1000), item(-600), item(-400), item(900)];
        for it in items.iter_mut().take(3) {
            it.reference = "INV-1".to_string();
        }
        items[3].reference = "INV-2".to_string();

        MatchStrategy::AmountSum {
            partners: vec![],
            cascade: vec![CascadeKey::Reference],
        }
        .apply(&mut items, "0001")
        .unwrap();

        assert_eq!(matched_flags(&items), vec![true, true, true, false]);
    }

    #[test]
    fn test_amount_sum_cascade_applies_criteria_in_order() {
        // magnitudes all differ, so only the cascade passes can match:
        // the reference pass settles the first three, the text pass then
        // settles the next three out of what was left over
        let mut items = vec![
            item(1000),
            item(-700),
            item(-300),
            item(600),
            item(-200),
            item(-400),
            item(500),
        ];
        for it in items.iter_mut().take(3) {
            it.reference = "INV-1".to_string();
        }
        for it in items.iter_mut().skip(3).take(3) {
            it.text = "fee March".to_string();
        }

        MatchStrategy::AmountSum {
            partners: vec![],
            cascade: vec![CascadeKey::Reference, CascadeKey::Text],
        }
        .apply(&mut items, "0001")
        .unwrap();

        assert_eq!(
            matched_flags(&items),
            vec![true, true, true, true, true, true, false]
        );
    }

    #[test]
    fn test_amount_sum_restricts_candidates_to_trading_partners() {
        let mut items = vec![item(1000), item(-1000), item(2000), item(-2000)];
        items[0].trading_partner = "VND01".to_string();
        items[1].trading_partner = "VND01".to_string();
        // items 2 and 3 net to zero but belong to no listed partner

        MatchStrategy::AmountSum {
            partners: vec!["VND01".to_string()],
            cascade: vec![CascadeKey::TradingPartner],
        }
        .apply(&mut items, "0001")
        .unwrap();

        assert_eq!(matched_flags(&items), vec![true, true, false, false]);
        assert!(!items[2].processed);
        assert!(!items[3].processed);
    }

    #[test]
    fn test_matched_groups_sum_to_zero_per_currency() {
        let mut items = vec![item(1000), item(-1000), item(2500), item(-2500), item(700)];

        MatchStrategy::AmountSum {
            partners: vec![],
            cascade: vec![],
        }
        .apply(&mut items, "0001")
        .unwrap();

        let matched_sum: Decimal = items
            .iter()
            .filter(|it| it.matched)
            .map(|it| it.amount)
            .sum();
        assert!(matched_sum.round_dp(2).is_zero());
        assert!(!items[4].matched);
        assert_invariants(&items);
    }
}
