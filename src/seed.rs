use crate::database::Database;
use crate::error::Result;
use crate::models::{LotDraft, LotItemDraft, Registration, RefundStatus};
use chrono::Duration;
use log::info;
use rand::Rng;
use rand::seq::SliceRandom;

const SAMPLE_BETS: [&str; 4] = ["BetApp", "SeguraBet", "BetNacional", "MilhãoBet"];
const SAMPLE_RECRUITERS: [&str; 3] = ["Duzin", "TK", "Rai"];
const SAMPLE_VALUES: [i64; 4] = [1000, 2000, 3000, 4000];
const SAMPLE_OBSERVATIONS: [Option<&str>; 5] = [
    Some("Registro automático"),
    Some("Cliente novo"),
    Some("Promoção especial"),
    Some("Indicação"),
    None,
];
pub const SAMPLE_REGISTRATIONS: usize = 30;
/// Sample registrations are spread over this many days back from today
const SPREAD_DAYS: i64 = 42;
const LOT_LINK_PROBABILITY: f64 = 0.3;

/// Fills an empty store with sample bets, recruiters, one lot and
/// registrations from the last six weeks.
///
/// Does nothing when recruiters already exist. Returns whether data was written.
pub fn seed_sample_data<R: Rng>(db: &Database, rng: &mut R) -> Result<bool> {
    if db.count_recruiters()? > 0 {
        info!("Store already has data, skipping sample data");
        return Ok(false);
    }

    let bets = SAMPLE_BETS
        .iter()
        .map(|name| db.create_bet(name))
        .collect::<Result<Vec<_>>>()?;
    let recruiters = SAMPLE_RECRUITERS
        .iter()
        .map(|name| db.create_recruiter(name, true))
        .collect::<Result<Vec<_>>>()?;

    let lot_bet = &bets[0];
    let lot = db.save_lot(&LotDraft {
        bet_id: lot_bet.id.clone(),
        observation: Some(format!("Lote {} - Semana atual", lot_bet.name)),
        items: vec![
            LotItemDraft {
                value_cents: 1000,
                planned_quantity: 50,
            },
            LotItemDraft {
                value_cents: 2000,
                planned_quantity: 30,
            },
        ],
    })?;

    let now = db.get_current_time();
    for _ in 0..SAMPLE_REGISTRATIONS {
        let days_ago = rng.gen_range(0..SPREAD_DAYS);
        let recruiter = recruiters.choose(rng).unwrap_or(&recruiters[0]);
        let bet = bets.choose(rng).unwrap_or(&bets[0]);
        let value_cents = *SAMPLE_VALUES.choose(rng).unwrap_or(&SAMPLE_VALUES[0]);
        let refund = RefundStatus::from_flag(rng.gen_bool(0.5));
        let observation = SAMPLE_OBSERVATIONS.choose(rng).copied().flatten();

        let lot_id = (bet.id == lot_bet.id
            && (value_cents == 1000 || value_cents == 2000)
            && rng.gen_bool(LOT_LINK_PROBABILITY))
        .then(|| lot.id.clone());

        db.import_registration(&Registration {
            id: db.next_id(),
            timestamp: now - Duration::days(days_ago),
            recruiter_id: recruiter.id.clone(),
            bet_id: bet.id.clone(),
            value_cents,
            refund,
            observation: observation.map(str::to_string),
            lot_id,
        })?;
    }

    info!(
        "Sample data created: {} bets, {} recruiters, 1 lot, {} registrations",
        bets.len(),
        recruiters.len(),
        SAMPLE_REGISTRATIONS
    );
    Ok(true)
}
