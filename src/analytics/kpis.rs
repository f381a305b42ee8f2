use super::percentage;
use crate::models::{Cents, Registration};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_registrations: i64,
    pub total_value_cents: Cents,
    pub refunded_count: i64,
    pub not_refunded_count: i64,
    pub refunded_value_cents: Cents,
    pub not_refunded_value_cents: Cents,
    /// Refunded share of all registrations, in percent; 0 for an empty set
    pub refund_rate: f64,
}

pub fn compute_kpis(filtered: &[Registration]) -> Kpis {
    let mut kpis = Kpis::default();

    for registration in filtered {
        kpis.total_registrations += 1;
        kpis.total_value_cents += registration.value_cents;
        if registration.is_refunded() {
            kpis.refunded_count += 1;
            kpis.refunded_value_cents += registration.value_cents;
        } else {
            kpis.not_refunded_count += 1;
            kpis.not_refunded_value_cents += registration.value_cents;
        }
    }

    kpis.refund_rate = percentage(kpis.refunded_count, kpis.total_registrations);
    kpis
}
