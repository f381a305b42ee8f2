use crate::analytics::Filters;
use crate::format::parse_amount;
use crate::models::{Cents, LotDraft, LotItemDraft, RefundStatus, RegistrationDraft};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Registration dashboard for bet recruiters
#[derive(Parser, Debug, Clone)]
#[command(name = "bancas")]
#[command(about = "Track registrations, refunds and lot progress per bet and recruiter", long_about = None)]
#[command(version)]
pub struct Args {
    /// Use in-memory database for testing
    #[arg(long, global = true, help = "Use in-memory database for testing")]
    pub test: bool,

    /// Custom database file path
    #[arg(long, global = true, value_name = "PATH", help = "Use custom database file path")]
    pub db_path: Option<PathBuf>,

    /// Override current date for testing (YYYY-MM-DD format)
    #[arg(
        long,
        global = true,
        value_name = "DATE",
        help = "Override current date (YYYY-MM-DD format)"
    )]
    pub override_date: Option<String>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(long, global = true, help = "Print reports as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// KPIs, grouped summaries and weekly evolution
    Dashboard {
        /// First day of the period (defaults to 30 days before today)
        #[arg(long, value_name = "DATE")]
        from: Option<String>,
        /// Last day of the period (defaults to today)
        #[arg(long, value_name = "DATE")]
        to: Option<String>,
        /// Restrict to a bet id (repeatable)
        #[arg(long = "bet", value_name = "BET_ID")]
        bets: Vec<String>,
        /// Restrict to a recruiter id (repeatable)
        #[arg(long = "recruiter", value_name = "RECRUITER_ID")]
        recruiters: Vec<String>,
        #[arg(long)]
        exclude_refunded: bool,
    },
    /// Progress of every lot, newest first
    Lots,
    /// Per-value progress of one lot
    Lot {
        #[arg(value_name = "LOT_ID")]
        lot_id: String,
    },
    /// Fill an empty store with sample data
    Seed,

    Bets,
    AddBet {
        name: String,
    },
    /// Rename a bet
    EditBet {
        #[arg(value_name = "BET_ID")]
        bet_id: String,
        name: String,
    },
    /// Registrations and lots of the bet are kept
    DeleteBet {
        #[arg(value_name = "BET_ID")]
        bet_id: String,
    },

    Recruiters,
    AddRecruiter {
        name: String,
        #[arg(long)]
        inactive: bool,
    },
    EditRecruiter {
        #[arg(value_name = "RECRUITER_ID")]
        recruiter_id: String,
        #[arg(long)]
        name: Option<String>,
    },
    ActivateRecruiter {
        #[arg(value_name = "RECRUITER_ID")]
        recruiter_id: String,
    },
    DeactivateRecruiter {
        #[arg(value_name = "RECRUITER_ID")]
        recruiter_id: String,
    },
    DeleteRecruiter {
        #[arg(value_name = "RECRUITER_ID")]
        recruiter_id: String,
    },

    /// Every registration, newest first
    Registrations,
    AddRegistration(RegistrationFields),
    /// Replace every field of a registration except its timestamp
    EditRegistration {
        #[arg(value_name = "REGISTRATION_ID")]
        registration_id: String,
        #[command(flatten)]
        fields: RegistrationFields,
    },
    DeleteRegistration {
        #[arg(value_name = "REGISTRATION_ID")]
        registration_id: String,
    },

    AddLot(LotFields),
    /// Replace the bet, observation and items of a lot
    EditLot {
        #[arg(value_name = "LOT_ID")]
        lot_id: String,
        #[command(flatten)]
        fields: LotFields,
    },
    /// Linked registrations keep their lot id
    DeleteLot {
        #[arg(value_name = "LOT_ID")]
        lot_id: String,
    },
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct RegistrationFields {
    #[arg(long, value_name = "RECRUITER_ID")]
    pub recruiter: String,
    #[arg(long, value_name = "BET_ID")]
    pub bet: String,
    /// Amount in reais, e.g. 10,00 or 10.5
    #[arg(long)]
    pub value: String,
    #[arg(long)]
    pub refunded: bool,
    #[arg(long, value_name = "LOT_ID")]
    pub lot: Option<String>,
    #[arg(long)]
    pub observation: Option<String>,
}

impl RegistrationFields {
    pub fn to_draft(&self) -> Result<RegistrationDraft, String> {
        let value_cents: Cents = parse_amount(&self.value)?;
        Ok(RegistrationDraft {
            recruiter_id: self.recruiter.clone(),
            bet_id: self.bet.clone(),
            value_cents,
            refund: RefundStatus::from_flag(self.refunded),
            observation: clean_observation(self.observation.as_deref()),
            lot_id: self.lot.clone(),
        })
    }
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct LotFields {
    #[arg(long, value_name = "BET_ID")]
    pub bet: String,
    /// Planned item as VALUE:QUANTITY, e.g. 10,00:50 (repeatable)
    #[arg(long = "item", value_name = "VALUE:QUANTITY", required = true)]
    pub items: Vec<String>,
    #[arg(long)]
    pub observation: Option<String>,
}

impl LotFields {
    pub fn to_draft(&self) -> Result<LotDraft, String> {
        let items = self
            .items
            .iter()
            .map(|item| parse_lot_item(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LotDraft {
            bet_id: self.bet.clone(),
            observation: clean_observation(self.observation.as_deref()),
            items,
        })
    }
}

/// `VALUE:QUANTITY`, value in reais and quantity a whole number
pub fn parse_lot_item(input: &str) -> Result<LotItemDraft, String> {
    let (value, quantity) = input
        .split_once(':')
        .ok_or_else(|| format!("Invalid lot item '{}'. Expected VALUE:QUANTITY", input))?;
    let planned_quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid quantity in lot item '{}'", input))?;
    Ok(LotItemDraft {
        value_cents: parse_amount(value)?,
        planned_quantity,
    })
}

fn clean_observation(observation: Option<&str>) -> Option<String> {
    observation
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the override_date argument if provided
    pub fn validate_override_date(&self) -> Result<Option<NaiveDate>, String> {
        self.override_date
            .as_deref()
            .map(|date_str| parse_date("--override-date", date_str))
            .transpose()
    }
}

fn parse_date(flag: &str, date_str: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
        format!(
            "Invalid date format for {}: '{}'. Expected YYYY-MM-DD",
            flag, date_str
        )
    })
}

/// Builds dashboard filters from the `dashboard` subcommand options.
/// Missing bounds fall back to `defaults`.
pub fn build_filters(
    defaults: Filters,
    from: Option<&str>,
    to: Option<&str>,
    bets: &[String],
    recruiters: &[String],
    exclude_refunded: bool,
) -> Result<Filters, String> {
    let mut filters = defaults;
    if let Some(from) = from {
        filters.start_date = parse_date("--from", from)?;
    }
    if let Some(to) = to {
        filters.end_date = parse_date("--to", to)?;
    }
    filters.bets.extend(bets.iter().cloned());
    filters.recruiters.extend(recruiters.iter().cloned());
    filters.include_refunded = !exclude_refunded;
    Ok(filters)
}
