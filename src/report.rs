use crate::analytics::{
    BetSummary, Filters, Kpis, LotProgress, LotStatus, RecruiterSummary, ValueSummary,
    WeeklyBucket,
};
use crate::dashboard_service::{DashboardReport, LotDetail};
use crate::format::{format_currency, format_date_time, format_percentage};
use crate::models::{Bet, Recruiter, Registration};
use chrono::NaiveDate;
use colored::{Color, Colorize};
use std::collections::BTreeSet;

const NOT_AVAILABLE: &str = "N/A";
const NO_DATA: &str = "  No data";

/// Renders view models as plain-text tables for the terminal
pub struct ReportRenderer {
    use_color: bool,
}

impl ReportRenderer {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn heading(&self, text: &str) -> String {
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Cells are padded before painting so escape codes don't break alignment
    fn paint(&self, text: String, color: Color) -> String {
        if self.use_color {
            text.color(color).to_string()
        } else {
            text
        }
    }

    pub fn render_dashboard(&self, report: &DashboardReport) -> String {
        let mut lines = Vec::new();
        self.filters_section(&mut lines, &report.filters);
        lines.push(String::new());
        self.kpis_section(&mut lines, &report.kpis);
        lines.push(String::new());
        self.bet_section(&mut lines, &report.by_bet);
        lines.push(String::new());
        self.recruiter_section(&mut lines, &report.by_recruiter);
        lines.push(String::new());
        self.value_section(&mut lines, &report.by_value);
        lines.push(String::new());
        self.weekly_section(&mut lines, &report.weekly);
        lines.join("\n")
    }

    fn filters_section(&self, lines: &mut Vec<String>, filters: &Filters) {
        lines.push(self.heading(&format!(
            "Dashboard {} - {}",
            format_date(filters.start_date),
            format_date(filters.end_date)
        )));
        lines.push(format!(
            "Bets: {} | Recruiters: {} | Refunds: {}",
            selection(&filters.bets),
            selection(&filters.recruiters),
            if filters.include_refunded {
                "included"
            } else {
                "excluded"
            }
        ));
    }

    fn kpis_section(&self, lines: &mut Vec<String>, kpis: &Kpis) {
        lines.push(self.heading("Summary"));
        lines.push(format!("  {:<15}{}", "Registrations:", kpis.total_registrations));
        lines.push(format!(
            "  {:<15}{}",
            "Total value:",
            format_currency(kpis.total_value_cents)
        ));
        lines.push(format!(
            "  {:<15}{}",
            "Refunded:",
            self.paint(
                format!(
                    "{} ({})",
                    kpis.refunded_count,
                    format_currency(kpis.refunded_value_cents)
                ),
                Color::Red
            )
        ));
        lines.push(format!(
            "  {:<15}{}",
            "Not refunded:",
            self.paint(
                format!(
                    "{} ({})",
                    kpis.not_refunded_count,
                    format_currency(kpis.not_refunded_value_cents)
                ),
                Color::Green
            )
        ));
        lines.push(format!(
            "  {:<15}{}",
            "Refund rate:",
            format_percentage(kpis.refund_rate)
        ));
    }

    fn bet_section(&self, lines: &mut Vec<String>, rows: &[BetSummary]) {
        lines.push(self.heading("By bet"));
        if rows.is_empty() {
            lines.push(NO_DATA.to_string());
            return;
        }
        lines.push(group_header("Bet"));
        for row in rows {
            lines.push(self.group_row(
                &row.bet_name,
                row.registrations,
                row.total_cents,
                row.refunded,
                row.refund_percentage,
            ));
        }
    }

    fn recruiter_section(&self, lines: &mut Vec<String>, rows: &[RecruiterSummary]) {
        lines.push(self.heading("By recruiter"));
        if rows.is_empty() {
            lines.push(NO_DATA.to_string());
            return;
        }
        lines.push(group_header("Recruiter"));
        for row in rows {
            lines.push(self.group_row(
                &row.recruiter_name,
                row.registrations,
                row.total_cents,
                row.refunded,
                row.refund_percentage,
            ));
        }
    }

    fn value_section(&self, lines: &mut Vec<String>, rows: &[ValueSummary]) {
        lines.push(self.heading("By value"));
        if rows.is_empty() {
            lines.push(NO_DATA.to_string());
            return;
        }
        lines.push(group_header("Value"));
        for row in rows {
            lines.push(self.group_row(
                &format_currency(row.value_cents),
                row.registrations,
                row.total_cents,
                row.refunded,
                row.refund_percentage,
            ));
        }
    }

    fn group_row(
        &self,
        label: &str,
        registrations: i64,
        total_cents: i64,
        refunded: i64,
        refund_percentage: f64,
    ) -> String {
        format!(
            "  {:<16} {:>6} {:>14} {} {:>7}",
            label,
            registrations,
            format_currency(total_cents),
            self.paint(format!("{:>9}", refunded), Color::Red),
            format_percentage(refund_percentage)
        )
    }

    fn weekly_section(&self, lines: &mut Vec<String>, buckets: &[WeeklyBucket]) {
        lines.push(self.heading("Weekly"));
        if buckets.is_empty() {
            lines.push(NO_DATA.to_string());
            return;
        }
        lines.push(format!("  {:<10} {:>6} {:>14}", "Week", "Count", "Total"));
        for bucket in buckets {
            lines.push(format!(
                "  {:<10} {:>6} {:>14}",
                bucket.week,
                bucket.registrations,
                format_currency(bucket.total_cents)
            ));
        }
    }

    /// One block per lot, in the order given
    pub fn render_lots(&self, lots: &[LotProgress]) -> String {
        let mut lines = vec![self.heading("Lots")];
        if lots.is_empty() {
            lines.push(NO_DATA.to_string());
            return lines.join("\n");
        }
        for (i, progress) in lots.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            self.lot_block(&mut lines, progress);
        }
        lines.join("\n")
    }

    fn lot_block(&self, lines: &mut Vec<String>, progress: &LotProgress) {
        let bet_name = progress
            .bet
            .as_ref()
            .map(|bet| bet.name.as_str())
            .unwrap_or(NOT_AVAILABLE);
        lines.push(format!(
            "  Lot {} - {} (created {})",
            progress.lot.id,
            bet_name,
            format_date_time(&progress.lot.created_at)
        ));
        lines.push(format!(
            "    Planned: {} | Executed: {} | Remaining: {} | Progress: {} | Status: {}",
            progress.planned_total,
            progress.executed_total,
            progress.remaining_total,
            format_percentage(progress.progress_percentage()),
            self.status(progress.status())
        ));
        if let Some(observation) = &progress.lot.observation {
            lines.push(format!("    Note: {}", observation));
        }
    }

    fn status(&self, status: LotStatus) -> String {
        let color = match status {
            LotStatus::Complete => Color::Green,
            LotStatus::InProgress => Color::Yellow,
            LotStatus::Pending => Color::White,
        };
        self.paint(status.as_str().to_string(), color)
    }

    pub fn render_lot_detail(&self, detail: &LotDetail) -> String {
        let mut lines = vec![self.heading("Lot detail")];
        self.lot_block(&mut lines, &detail.progress);
        lines.push(String::new());
        lines.push(format!(
            "  {:>14} {:>8} {:>9} {:>10} {:>9}",
            "Value", "Planned", "Executed", "Remaining", "Progress"
        ));
        for item in &detail.items {
            lines.push(format!(
                "  {:>14} {:>8} {:>9} {:>10} {:>9}",
                format_currency(item.value_cents),
                item.planned,
                item.executed,
                item.remaining,
                format_percentage(item.progress_percentage())
            ));
        }
        lines.join("\n")
    }

    pub fn render_bets(&self, bets: &[Bet]) -> String {
        let mut lines = vec![self.heading("Bets")];
        if bets.is_empty() {
            lines.push(NO_DATA.to_string());
        }
        for bet in bets {
            lines.push(format!("  {} | {}", bet.id, bet.name));
        }
        lines.join("\n")
    }

    pub fn render_recruiters(&self, recruiters: &[Recruiter]) -> String {
        let mut lines = vec![self.heading("Recruiters")];
        if recruiters.is_empty() {
            lines.push(NO_DATA.to_string());
        }
        for recruiter in recruiters {
            let state = if recruiter.active {
                self.paint("active".to_string(), Color::Green)
            } else {
                "inactive".to_string()
            };
            lines.push(format!("  {} | {} | {}", recruiter.id, recruiter.name, state));
        }
        lines.join("\n")
    }

    /// Newest first; unknown bet or recruiter ids show as `N/A`
    pub fn render_registrations(
        &self,
        registrations: &[Registration],
        bets: &[Bet],
        recruiters: &[Recruiter],
    ) -> String {
        let mut lines = vec![self.heading("Registrations")];
        if registrations.is_empty() {
            lines.push(NO_DATA.to_string());
        }

        let mut newest_first: Vec<&Registration> = registrations.iter().collect();
        newest_first.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        for registration in newest_first {
            let recruiter = recruiters
                .iter()
                .find(|r| r.id == registration.recruiter_id)
                .map(|r| r.name.as_str())
                .unwrap_or(NOT_AVAILABLE);
            let bet = bets
                .iter()
                .find(|b| b.id == registration.bet_id)
                .map(|b| b.name.as_str())
                .unwrap_or(NOT_AVAILABLE);
            let refund = if registration.is_refunded() {
                self.paint("refunded".to_string(), Color::Red)
            } else {
                "not refunded".to_string()
            };

            let mut line = format!(
                "  {} | {} | {} | {} | {} | {}",
                registration.id,
                format_date_time(&registration.timestamp),
                recruiter,
                bet,
                format_currency(registration.value_cents),
                refund
            );
            if let Some(lot_id) = &registration.lot_id {
                line.push_str(&format!(" | lot {}", lot_id));
            }
            if let Some(observation) = &registration.observation {
                line.push_str(&format!(" | {}", observation));
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn selection(ids: &BTreeSet<String>) -> String {
    if ids.is_empty() {
        "all".to_string()
    } else {
        format!("{} selected", ids.len())
    }
}

fn group_header(label: &str) -> String {
    format!(
        "  {:<16} {:>6} {:>14} {:>9} {:>7}",
        label, "Count", "Total", "Refunded", "Rate"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{date, utc_noon};
    use crate::models::{Lot, RefundStatus};
    use crate::analytics::LotItemDetail;

    fn sample_report() -> DashboardReport {
        DashboardReport {
            filters: Filters::new(date(2025, 2, 13), date(2025, 3, 15)),
            kpis: Kpis {
                total_registrations: 3,
                total_value_cents: 7000,
                refunded_count: 1,
                not_refunded_count: 2,
                refunded_value_cents: 2000,
                not_refunded_value_cents: 5000,
                refund_rate: 100.0 / 3.0,
            },
            by_bet: vec![
                BetSummary {
                    bet_id: "bet_2".to_string(),
                    bet_name: "SeguraBet".to_string(),
                    registrations: 1,
                    total_cents: 4000,
                    refunded: 0,
                    not_refunded: 1,
                    refund_percentage: 0.0,
                },
                BetSummary {
                    bet_id: "bet_1".to_string(),
                    bet_name: "BetApp".to_string(),
                    registrations: 2,
                    total_cents: 3000,
                    refunded: 1,
                    not_refunded: 1,
                    refund_percentage: 50.0,
                },
            ],
            by_recruiter: vec![RecruiterSummary {
                recruiter_id: "rec_1".to_string(),
                recruiter_name: "Duzin".to_string(),
                registrations: 3,
                total_cents: 7000,
                refunded: 1,
                refund_percentage: 100.0 / 3.0,
            }],
            by_value: vec![ValueSummary {
                value_cents: 123456,
                registrations: 1,
                total_cents: 123456,
                refunded: 0,
                refund_percentage: 0.0,
            }],
            weekly: vec![WeeklyBucket {
                week: "2025-S11".to_string(),
                registrations: 3,
                total_cents: 7000,
            }],
        }
    }

    fn sample_lot(bet: Option<Bet>, observation: Option<&str>) -> LotProgress {
        LotProgress {
            lot: Lot {
                id: "lot_1".to_string(),
                bet_id: "bet_1".to_string(),
                created_at: utc_noon(2025, 3, 10),
                observation: observation.map(str::to_string),
            },
            bet,
            planned_total: 80,
            executed_total: 23,
            remaining_total: 57,
        }
    }

    #[test]
    fn test_render_empty_dashboard() {
        let mut report = sample_report();
        report.kpis = Kpis::default();
        report.by_bet.clear();
        report.by_recruiter.clear();
        report.by_value.clear();
        report.weekly.clear();
        report.filters.include_refunded = false;
        report.filters.bets.insert("bet_1".to_string());

        let text = ReportRenderer::new(false).render_dashboard(&report);
        insta::assert_snapshot!(text, @r"
        Dashboard 13/02/2025 - 15/03/2025
        Bets: 1 selected | Recruiters: all | Refunds: excluded

        Summary
          Registrations: 0
          Total value:   R$ 0,00
          Refunded:      0 (R$ 0,00)
          Not refunded:  0 (R$ 0,00)
          Refund rate:   0,0%

        By bet
          No data

        By recruiter
          No data

        By value
          No data

        Weekly
          No data
        ");
    }

    #[test]
    fn test_render_dashboard_tables() {
        let text = ReportRenderer::new(false).render_dashboard(&sample_report());
        insta::assert_snapshot!(text, @r"
        Dashboard 13/02/2025 - 15/03/2025
        Bets: all | Recruiters: all | Refunds: included

        Summary
          Registrations: 3
          Total value:   R$ 70,00
          Refunded:      1 (R$ 20,00)
          Not refunded:  2 (R$ 50,00)
          Refund rate:   33,3%

        By bet
          Bet               Count          Total  Refunded    Rate
          SeguraBet             1       R$ 40,00         0    0,0%
          BetApp                2       R$ 30,00         1   50,0%

        By recruiter
          Recruiter         Count          Total  Refunded    Rate
          Duzin                 3       R$ 70,00         1   33,3%

        By value
          Value             Count          Total  Refunded    Rate
          R$ 1.234,56           1    R$ 1.234,56         0    0,0%

        Weekly
          Week        Count          Total
          2025-S11        3       R$ 70,00
        ");
    }

    #[test]
    fn test_render_lots_with_missing_bet() {
        let lots = vec![
            sample_lot(
                Some(Bet {
                    id: "bet_1".to_string(),
                    name: "BetApp".to_string(),
                }),
                Some("Semana atual"),
            ),
            sample_lot(None, None),
        ];

        let text = ReportRenderer::new(false).render_lots(&lots);
        insta::assert_snapshot!(text, @r"
        Lots
          Lot lot_1 - BetApp (created 10/03/2025 12:00)
            Planned: 80 | Executed: 23 | Remaining: 57 | Progress: 28,8% | Status: in_progress
            Note: Semana atual

          Lot lot_1 - N/A (created 10/03/2025 12:00)
            Planned: 80 | Executed: 23 | Remaining: 57 | Progress: 28,8% | Status: in_progress
        ");
    }

    #[test]
    fn test_render_no_lots() {
        let text = ReportRenderer::new(false).render_lots(&[]);
        assert_eq!(text, "Lots\n  No data");
    }

    #[test]
    fn test_render_lot_detail() {
        let detail = LotDetail {
            progress: sample_lot(None, None),
            items: vec![
                LotItemDetail {
                    value_cents: 1000,
                    planned: 50,
                    executed: 18,
                    remaining: 32,
                },
                LotItemDetail {
                    value_cents: 2000,
                    planned: 30,
                    executed: 5,
                    remaining: 25,
                },
            ],
        };

        let text = ReportRenderer::new(false).render_lot_detail(&detail);
        insta::assert_snapshot!(text, @r"
        Lot detail
          Lot lot_1 - N/A (created 10/03/2025 12:00)
            Planned: 80 | Executed: 23 | Remaining: 57 | Progress: 28,8% | Status: in_progress

                   Value  Planned  Executed  Remaining  Progress
                R$ 10,00       50        18         32     36,0%
                R$ 20,00       30         5         25     16,7%
        ");
    }

    #[test]
    fn test_render_registrations_newest_first() {
        let bets = vec![Bet {
            id: "bet_1".to_string(),
            name: "BetApp".to_string(),
        }];
        let recruiters = vec![Recruiter {
            id: "rec_1".to_string(),
            name: "Duzin".to_string(),
            active: false,
        }];
        let registrations = vec![
            Registration {
                id: "reg_1".to_string(),
                timestamp: utc_noon(2025, 3, 10),
                recruiter_id: "rec_1".to_string(),
                bet_id: "bet_1".to_string(),
                value_cents: 1000,
                refund: RefundStatus::NotRefunded,
                observation: None,
                lot_id: Some("lot_1".to_string()),
            },
            Registration {
                id: "reg_2".to_string(),
                timestamp: utc_noon(2025, 3, 12),
                recruiter_id: "gone".to_string(),
                bet_id: "bet_1".to_string(),
                value_cents: 2000,
                refund: RefundStatus::Refunded,
                observation: Some("Cliente novo".to_string()),
                lot_id: None,
            },
        ];

        let renderer = ReportRenderer::new(false);
        insta::assert_snapshot!(renderer.render_registrations(&registrations, &bets, &recruiters), @r"
        Registrations
          reg_2 | 12/03/2025 12:00 | N/A | BetApp | R$ 20,00 | refunded | Cliente novo
          reg_1 | 10/03/2025 12:00 | Duzin | BetApp | R$ 10,00 | not refunded | lot lot_1
        ");
        insta::assert_snapshot!(renderer.render_recruiters(&recruiters), @r"
        Recruiters
          rec_1 | Duzin | inactive
        ");
        assert_eq!(renderer.render_bets(&bets), "Bets\n  bet_1 | BetApp");
        assert_eq!(renderer.render_bets(&[]), "Bets\n  No data");
    }

    #[test]
    fn test_color_only_when_enabled() {
        colored::control::set_override(true);
        let plain = ReportRenderer::new(false).render_lots(&[sample_lot(None, None)]);
        let painted = ReportRenderer::new(true).render_lots(&[sample_lot(None, None)]);
        colored::control::unset_override();

        assert!(!plain.contains('\u{1b}'));
        assert!(painted.contains('\u{1b}'));
    }
}
