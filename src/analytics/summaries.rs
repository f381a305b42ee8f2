use super::percentage;
use crate::models::{Bet, Cents, Recruiter, Registration};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetSummary {
    pub bet_id: String,
    pub bet_name: String,
    pub registrations: i64,
    pub total_cents: Cents,
    pub refunded: i64,
    pub not_refunded: i64,
    pub refund_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterSummary {
    pub recruiter_id: String,
    pub recruiter_name: String,
    pub registrations: i64,
    pub total_cents: Cents,
    pub refunded: i64,
    pub refund_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSummary {
    pub value_cents: Cents,
    pub registrations: i64,
    pub total_cents: Cents,
    pub refunded: i64,
    pub refund_percentage: f64,
}

/// Running totals for one group
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    count: i64,
    total: Cents,
    refunded: i64,
}

impl Tally {
    fn add(&mut self, registration: &Registration) {
        self.count += 1;
        self.total += registration.value_cents;
        if registration.is_refunded() {
            self.refunded += 1;
        }
    }
}

/// Tallies registrations into one slot per known key, in the order the keys
/// are given. Registrations whose key is unknown are skipped.
fn tally_known<'a>(
    keys: impl Iterator<Item = &'a str>,
    filtered: &[Registration],
    key_of: impl Fn(&Registration) -> &str,
) -> Vec<Tally> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies = Vec::new();
    for key in keys {
        // A repeated id keeps its first slot
        index.entry(key).or_insert_with(|| {
            tallies.push(Tally::default());
            tallies.len() - 1
        });
    }

    for registration in filtered {
        if let Some(&slot) = index.get(key_of(registration)) {
            tallies[slot].add(registration);
        }
    }
    tallies
}

/// One row per known bet that has at least one registration, highest total first
pub fn summarize_by_bet(filtered: &[Registration], bets: &[Bet]) -> Vec<BetSummary> {
    let tallies = tally_known(bets.iter().map(|b| b.id.as_str()), filtered, |r| {
        r.bet_id.as_str()
    });

    let mut rows: Vec<BetSummary> = unique_by_id(bets.iter(), |b| b.id.as_str())
        .zip(tallies)
        .filter(|(_, tally)| tally.count > 0)
        .map(|(bet, tally)| BetSummary {
            bet_id: bet.id.clone(),
            bet_name: bet.name.clone(),
            registrations: tally.count,
            total_cents: tally.total,
            refunded: tally.refunded,
            not_refunded: tally.count - tally.refunded,
            refund_percentage: percentage(tally.refunded, tally.count),
        })
        .collect();

    rows.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));
    rows
}

/// One row per known recruiter (active or not) with at least one registration,
/// highest total first
pub fn summarize_by_recruiter(
    filtered: &[Registration],
    recruiters: &[Recruiter],
) -> Vec<RecruiterSummary> {
    let tallies = tally_known(
        recruiters.iter().map(|r| r.id.as_str()),
        filtered,
        |r| r.recruiter_id.as_str(),
    );

    let mut rows: Vec<RecruiterSummary> = unique_by_id(recruiters.iter(), |r| r.id.as_str())
        .zip(tallies)
        .filter(|(_, tally)| tally.count > 0)
        .map(|(recruiter, tally)| RecruiterSummary {
            recruiter_id: recruiter.id.clone(),
            recruiter_name: recruiter.name.clone(),
            registrations: tally.count,
            total_cents: tally.total,
            refunded: tally.refunded,
            refund_percentage: percentage(tally.refunded, tally.count),
        })
        .collect();

    rows.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));
    rows
}

/// One row per distinct registration value, highest total first. Groups with
/// equal totals keep ascending value order.
pub fn summarize_by_value(filtered: &[Registration]) -> Vec<ValueSummary> {
    let mut groups: BTreeMap<Cents, Tally> = BTreeMap::new();
    for registration in filtered {
        groups
            .entry(registration.value_cents)
            .or_default()
            .add(registration);
    }

    let mut rows: Vec<ValueSummary> = groups
        .into_iter()
        .map(|(value_cents, tally)| ValueSummary {
            value_cents,
            registrations: tally.count,
            total_cents: tally.total,
            refunded: tally.refunded,
            refund_percentage: percentage(tally.refunded, tally.count),
        })
        .collect();

    rows.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));
    rows
}

/// Drops later entries that repeat an id, matching the slots built by `tally_known`
fn unique_by_id<'a, T: 'a>(
    items: impl Iterator<Item = &'a T>,
    id_of: impl Fn(&T) -> &str,
) -> impl Iterator<Item = &'a T> {
    let mut seen = HashSet::new();
    items.filter(move |item| seen.insert(id_of(*item).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::registration;

    fn bet(id: &str, name: &str) -> Bet {
        Bet {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn recruiter(id: &str, name: &str, active: bool) -> Recruiter {
        Recruiter {
            id: id.to_string(),
            name: name.to_string(),
            active,
        }
    }

    fn is_non_increasing(totals: &[Cents]) -> bool {
        totals.windows(2).all(|pair| pair[0] >= pair[1])
    }

    #[test]
    fn test_by_bet_skips_bets_without_registrations() {
        let bets = vec![bet("b1", "BetApp"), bet("b2", "SeguraBet"), bet("b3", "BetNacional")];
        let filtered = vec![
            registration("r1", "rec_1", "b1", 1000, false),
            registration("r2", "rec_1", "b3", 4000, true),
            registration("r3", "rec_1", "b3", 2000, false),
        ];

        let rows = summarize_by_bet(&filtered, &bets);

        let names: Vec<&str> = rows.iter().map(|r| r.bet_name.as_str()).collect();
        assert_eq!(names, vec!["BetNacional", "BetApp"]);
        assert_eq!(rows[0].registrations, 2);
        assert_eq!(rows[0].total_cents, 6000);
        assert_eq!(rows[0].refunded, 1);
        assert_eq!(rows[0].not_refunded, 1);
        assert_eq!(rows[0].refund_percentage, 50.0);
        assert_eq!(rows[1].refund_percentage, 0.0);
    }

    #[test]
    fn test_by_bet_ignores_unknown_bets() {
        let bets = vec![bet("b1", "BetApp")];
        let filtered = vec![
            registration("r1", "rec_1", "deleted", 9000, false),
            registration("r2", "rec_1", "b1", 1000, false),
        ];

        let rows = summarize_by_bet(&filtered, &bets);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_cents, 1000);
    }

    #[test]
    fn test_by_bet_ties_keep_bet_order() {
        let bets = vec![bet("b1", "First"), bet("b2", "Second"), bet("b3", "Third")];
        let filtered = vec![
            registration("r1", "rec_1", "b3", 1000, false),
            registration("r2", "rec_1", "b2", 1000, false),
            registration("r3", "rec_1", "b1", 1000, false),
        ];

        let names: Vec<String> = summarize_by_bet(&filtered, &bets)
            .into_iter()
            .map(|r| r.bet_name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_by_recruiter_includes_inactive_history() {
        let recruiters = vec![
            recruiter("rec_1", "Duzin", true),
            recruiter("rec_2", "TK", false),
            recruiter("rec_3", "Rai", true),
        ];
        let filtered = vec![
            registration("r1", "rec_2", "b1", 3000, true),
            registration("r2", "rec_2", "b1", 1000, false),
            registration("r3", "rec_2", "b1", 1000, false),
            registration("r4", "rec_2", "b1", 1000, true),
            registration("r5", "rec_1", "b1", 2000, false),
        ];

        let rows = summarize_by_recruiter(&filtered, &recruiters);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].recruiter_name, "TK");
        assert_eq!(rows[0].registrations, 4);
        assert_eq!(rows[0].total_cents, 6000);
        assert_eq!(rows[0].refund_percentage, 50.0);
        assert_eq!(rows[1].recruiter_name, "Duzin");
        assert_eq!(rows[1].refund_percentage, 0.0);
    }

    #[test]
    fn test_by_recruiter_same_name_keeps_separate_refunds() {
        let recruiters = vec![recruiter("rec_1", "Ana", true), recruiter("rec_2", "Ana", true)];
        let filtered = vec![
            registration("r1", "rec_1", "b1", 2000, true),
            registration("r2", "rec_2", "b1", 1000, false),
        ];

        let rows = summarize_by_recruiter(&filtered, &recruiters);
        assert_eq!(rows[0].recruiter_id, "rec_1");
        assert_eq!(rows[0].refund_percentage, 100.0);
        assert_eq!(rows[1].recruiter_id, "rec_2");
        assert_eq!(rows[1].refund_percentage, 0.0);
    }

    #[test]
    fn test_by_value_groups_dynamic_keys() {
        let filtered = vec![
            registration("r1", "rec_1", "b1", 1000, false),
            registration("r2", "rec_1", "b1", 4000, true),
            registration("r3", "rec_1", "b1", 1000, true),
            registration("r4", "rec_1", "b1", 1000, false),
            registration("r5", "rec_1", "b1", 1550, false),
        ];

        let rows = summarize_by_value(&filtered);

        let keys: Vec<Cents> = rows.iter().map(|r| r.value_cents).collect();
        assert_eq!(keys, vec![4000, 1000, 1550]);
        assert_eq!(rows[1].registrations, 3);
        assert_eq!(rows[1].total_cents, 3000);
        assert_eq!(rows[1].refunded, 1);
        assert!((rows[1].refund_percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_by_value_ties_keep_ascending_value() {
        let filtered = vec![
            registration("r1", "rec_1", "b1", 2000, false),
            registration("r2", "rec_1", "b1", 1000, false),
            registration("r3", "rec_1", "b1", 1000, false),
        ];

        let keys: Vec<Cents> = summarize_by_value(&filtered)
            .iter()
            .map(|r| r.value_cents)
            .collect();
        assert_eq!(keys, vec![1000, 2000]);
    }

    #[test]
    fn test_all_summaries_sorted_by_total() {
        let bets = vec![bet("b1", "A"), bet("b2", "B"), bet("b3", "C")];
        let recruiters = vec![recruiter("rec_1", "X", true), recruiter("rec_2", "Y", true)];
        let filtered: Vec<Registration> = (0..12)
            .map(|i| {
                registration(
                    &format!("r{}", i),
                    if i % 3 == 0 { "rec_1" } else { "rec_2" },
                    ["b1", "b2", "b3"][i % 3],
                    1000 * (i as i64 % 4 + 1),
                    i % 5 == 0,
                )
            })
            .collect();

        let by_bet: Vec<Cents> = summarize_by_bet(&filtered, &bets)
            .iter()
            .map(|r| r.total_cents)
            .collect();
        let by_recruiter: Vec<Cents> = summarize_by_recruiter(&filtered, &recruiters)
            .iter()
            .map(|r| r.total_cents)
            .collect();
        let by_value: Vec<Cents> = summarize_by_value(&filtered)
            .iter()
            .map(|r| r.total_cents)
            .collect();

        assert!(is_non_increasing(&by_bet));
        assert!(is_non_increasing(&by_recruiter));
        assert!(is_non_increasing(&by_value));
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        let bets = vec![bet("b1", "BetApp")];
        assert!(summarize_by_bet(&[], &bets).is_empty());
        assert!(summarize_by_recruiter(&[], &[]).is_empty());
        assert!(summarize_by_value(&[]).is_empty());
    }
}
