//! Schedule rendering: CSV rows, JSON documents and summary tables.

use crate::error::Result;
use crate::schedule::{Schedule, ScheduleSummary};
use serde::Serialize;
use std::io::Write;

/// Writes one CSV row per loan per month.
///
/// Rows follow the schedule's chronological order, and within a month the
/// loans' priority order. All money columns carry exactly 2 decimal places.
pub fn write_schedule_csv<W: Write>(schedule: &Schedule, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "month",
        "loan_id",
        "name",
        "starting_balance",
        "interest_charged",
        "payment",
        "principal",
        "interest",
        "ending_balance",
        "paid_off",
    ])?;

    for month in &schedule.months {
        for detail in &month.loan_breakdown {
            csv_writer.write_record([
                month.month_number.to_string(),
                detail.loan_id.clone(),
                detail.name.clone(),
                detail.starting_balance.to_string(),
                detail.interest_charged.to_string(),
                detail.payment.to_string(),
                detail.principal_portion.to_string(),
                detail.interest_portion.to_string(),
                detail.ending_balance.to_string(),
                detail.paid_off.to_string(),
            ])?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes any report value (a schedule, summaries, an overview) as
/// pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(value: &T, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes one summary row per schedule.
///
/// `months` is the number of simulated months; it equals the payoff month
/// when the status is `ok`. Empty cells mean "not applicable".
pub fn write_summary_csv<W: Write>(summaries: &[ScheduleSummary], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "strategy",
        "status",
        "months",
        "total_paid",
        "total_interest",
        "final_debt",
        "shortfall",
    ])?;

    for summary in summaries {
        csv_writer.write_record([
            summary.strategy.to_string(),
            summary.status.as_str().to_string(),
            summary.months_simulated.to_string(),
            summary.total_paid.to_string(),
            summary.total_interest.to_string(),
            summary.final_debt.to_string(),
            summary
                .shortfall
                .map(|s| s.to_string())
                .unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
