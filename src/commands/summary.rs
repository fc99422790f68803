use crate::analysis::{period_report, PeriodReport};
use crate::commands::{load, Out};
use crate::load::Loader;
use crate::model::{Amount, Period};
use crate::{Config, Result};

/// Reports the headline figures of `period` (the latest when `None`) and compares them with the
/// period present before it. The first period in the data is reported without a comparison.
///
/// # Errors
/// - `UnknownPeriod` when `period` does not occur in the data.
pub async fn summary(
    config: &Config,
    loader: &dyn Loader,
    period: Option<Period>,
) -> Result<Out<PeriodReport>> {
    let ledger = load(config, loader).await?;
    let report = period_report(&ledger, period)?;
    let figures = &report.figures;
    let mut message = format!(
        "Total spend in {} was {}",
        figures.period,
        Amount::new(figures.total)
    );
    match &report.comparison {
        Some(c) => message.push_str(&format!(" ({} against {})", c.total.change, c.previous)),
        None => message.push_str(" (no earlier period to compare with)"),
    }
    message.push_str(&format!(
        ", average daily spend {}",
        Amount::new(figures.average_daily)
    ));
    Ok(Out::new(message, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{period, to_rows, TestEnv};
    use crate::ErrorType;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_summary_latest() {
        let env = TestEnv::new().await;
        let out = summary(&env.config(), env.loader(), None).await.unwrap();
        let report = out.structure().unwrap();
        let comparison = report.comparison.as_ref().unwrap();
        assert_eq!(comparison.previous, period("2024-02"));
        assert_eq!(comparison.debit.current, dec!(1050));
        assert_eq!(
            out.message(),
            "Total spend in 2024-04 was 1,515.00 (+20.24% against 2024-02), \
            average daily spend 303.00"
        );
    }

    #[tokio::test]
    async fn test_summary_first_period_has_no_comparison() {
        let env = TestEnv::new().await;
        let out = summary(&env.config(), env.loader(), Some(period("2024-01")))
            .await
            .unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.figures.total, dec!(1220));
        assert!(report.comparison.is_none());
        assert!(out.message().contains("no earlier period"));
    }

    #[tokio::test]
    async fn test_summary_single_period_data() {
        let invoice = to_rows(&[
            &["data_pagamento", "valor", "categoria"],
            &["2024-01-10", "10", "Lazer"],
            &["2024-01-11", "30", "Mercado"],
        ]);
        let statement = to_rows(&[&["Payment Date", "Amount", "Category"]]);
        let env = TestEnv::with_rows(invoice, statement).await;
        let out = summary(&env.config(), env.loader(), None).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.figures.records, 2);
        assert_eq!(report.figures.average_daily, dec!(20));
        assert!(report.comparison.is_none());
    }

    #[tokio::test]
    async fn test_summary_unknown_period() {
        let env = TestEnv::new().await;
        let err = summary(&env.config(), env.loader(), Some(period("2024-03")))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::UnknownPeriod);
    }

    #[tokio::test]
    async fn test_summary_source_unavailable() {
        let env = TestEnv::new().await;
        let loader = crate::load::MemoryLoader::new();
        let err = summary(&env.config(), &loader, None).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::SourceUnavailable);
    }
}
