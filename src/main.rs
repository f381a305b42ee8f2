use bancas_dashboard::cli::{self, Args, Command};
use bancas_dashboard::dashboard_service::DashboardService;
use bancas_dashboard::database::Database;
use bancas_dashboard::database_factory::{DatabaseConfig, DatabaseFactory};
use bancas_dashboard::error::DashboardError;
use bancas_dashboard::models::RecruiterUpdate;
use bancas_dashboard::report::ReportRenderer;
use bancas_dashboard::seed::seed_sample_data;
use log::info;
use serde::Serialize;
use std::error::Error;

fn main() {
    env_logger::init();

    let args = Args::parse_args();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let db = open_database(args)?;
    let service = DashboardService::new(&db);
    let renderer = ReportRenderer::new(!args.no_color);

    match &args.command {
        Command::Dashboard {
            from,
            to,
            bets,
            recruiters,
            exclude_refunded,
        } => {
            let filters = cli::build_filters(
                service.default_filters(),
                from.as_deref(),
                to.as_deref(),
                bets,
                recruiters,
                *exclude_refunded,
            )
            .map_err(DashboardError::InvalidInput)?;
            let report = service.dashboard(&filters)?;
            emit(args, &report, |r| renderer.render_dashboard(r))?;
        }
        Command::Lots => {
            let lots = service.lot_progress()?;
            emit(args, &lots, |l| renderer.render_lots(l))?;
        }
        Command::Lot { lot_id } => {
            let detail = service
                .lot_detail(lot_id)?
                .ok_or_else(|| not_found("Lot", lot_id))?;
            emit(args, &detail, |d| renderer.render_lot_detail(d))?;
        }
        Command::Seed => {
            if seed_sample_data(&db, &mut rand::thread_rng())? {
                println!("Sample data created");
            } else {
                println!("Store already has data, nothing to do");
            }
        }
        Command::Bets => {
            let bets = db.list_bets()?;
            emit(args, &bets, |b| renderer.render_bets(b))?;
        }
        Command::AddBet { name } => {
            let bet = db.create_bet(name)?;
            emit(args, &bet, |b| format!("Created bet {} ({})", b.name, b.id))?;
        }
        Command::EditBet { bet_id, name } => {
            let bet = db.update_bet(bet_id, name)?.ok_or_else(|| not_found("Bet", bet_id))?;
            emit(args, &bet, |b| format!("Renamed bet {} to {}", b.id, b.name))?;
        }
        Command::DeleteBet { bet_id } => {
            require(db.delete_bet(bet_id)?, "Bet", bet_id)?;
            println!("Deleted bet {}", bet_id);
        }
        Command::Recruiters => {
            let recruiters = db.list_recruiters()?;
            emit(args, &recruiters, |r| renderer.render_recruiters(r))?;
        }
        Command::AddRecruiter { name, inactive } => {
            let recruiter = db.create_recruiter(name, !inactive)?;
            emit(args, &recruiter, |r| {
                format!("Created recruiter {} ({})", r.name, r.id)
            })?;
        }
        Command::EditRecruiter { recruiter_id, name } => {
            let update = RecruiterUpdate {
                name: name.clone(),
                active: None,
            };
            let recruiter = db
                .update_recruiter(recruiter_id, &update)?
                .ok_or_else(|| not_found("Recruiter", recruiter_id))?;
            emit(args, &recruiter, |r| format!("Updated recruiter {} ({})", r.name, r.id))?;
        }
        Command::ActivateRecruiter { recruiter_id } => {
            set_active(args, &db, recruiter_id, true)?;
        }
        Command::DeactivateRecruiter { recruiter_id } => {
            set_active(args, &db, recruiter_id, false)?;
        }
        Command::DeleteRecruiter { recruiter_id } => {
            require(db.delete_recruiter(recruiter_id)?, "Recruiter", recruiter_id)?;
            println!("Deleted recruiter {}", recruiter_id);
        }
        Command::Registrations => {
            let registrations = db.list_registrations()?;
            let bets = db.list_bets()?;
            let recruiters = db.list_recruiters()?;
            emit(args, &registrations, |r| {
                renderer.render_registrations(r, &bets, &recruiters)
            })?;
        }
        Command::AddRegistration(fields) => {
            let draft = fields.to_draft().map_err(DashboardError::InvalidInput)?;
            let registration = db.create_registration(&draft)?;
            info!("Registration {} recorded", registration.id);
            emit(args, &registration, |r| format!("Created registration {}", r.id))?;
        }
        Command::EditRegistration {
            registration_id,
            fields,
        } => {
            let draft = fields.to_draft().map_err(DashboardError::InvalidInput)?;
            let registration = db
                .update_registration(registration_id, &draft)?
                .ok_or_else(|| not_found("Registration", registration_id))?;
            emit(args, &registration, |r| format!("Updated registration {}", r.id))?;
        }
        Command::DeleteRegistration { registration_id } => {
            require(
                db.delete_registration(registration_id)?,
                "Registration",
                registration_id,
            )?;
            println!("Deleted registration {}", registration_id);
        }
        Command::AddLot(fields) => {
            let draft = fields.to_draft().map_err(DashboardError::InvalidInput)?;
            let lot = db.save_lot(&draft)?;
            emit(args, &lot, |l| format!("Created lot {}", l.id))?;
        }
        Command::EditLot { lot_id, fields } => {
            let draft = fields.to_draft().map_err(DashboardError::InvalidInput)?;
            let lot = db
                .update_lot(lot_id, &draft)?
                .ok_or_else(|| not_found("Lot", lot_id))?;
            emit(args, &lot, |l| format!("Updated lot {}", l.id))?;
        }
        Command::DeleteLot { lot_id } => {
            require(db.delete_lot(lot_id)?, "Lot", lot_id)?;
            println!("Deleted lot {}", lot_id);
        }
    }

    Ok(())
}

fn open_database(args: &Args) -> Result<Database, Box<dyn Error>> {
    let mut builder = DatabaseConfig::builder();
    if args.test {
        builder = builder.test_mode();
    }
    if let Some(path) = &args.db_path {
        builder = builder.path(&path.to_string_lossy());
    }
    if let Some(date) = args.validate_override_date()? {
        builder = builder.date(date);
    }
    Ok(DatabaseFactory::create(builder.build())?)
}

fn not_found(kind: &str, id: &str) -> DashboardError {
    DashboardError::InvalidInput(format!("{} '{}' not found", kind, id))
}

fn require(found: bool, kind: &str, id: &str) -> Result<(), DashboardError> {
    if found { Ok(()) } else { Err(not_found(kind, id)) }
}

fn set_active(
    args: &Args,
    db: &Database,
    recruiter_id: &str,
    active: bool,
) -> Result<(), Box<dyn Error>> {
    let recruiter = db
        .set_recruiter_active(recruiter_id, active)?
        .ok_or_else(|| not_found("Recruiter", recruiter_id))?;
    emit(args, &recruiter, |r| {
        let state = if r.active { "active" } else { "inactive" };
        format!("Recruiter {} is now {}", r.name, state)
    })
}

/// JSON when `--json` is set, otherwise the given text rendering
fn emit<T: Serialize>(
    args: &Args,
    value: &T,
    render: impl FnOnce(&T) -> String,
) -> Result<(), Box<dyn Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", render(value));
    }
    Ok(())
}
