use crate::analysis::{change_report, ChangeReport, PeriodMatrix};
use crate::commands::{load, Out};
use crate::load::Loader;
use crate::{Config, Result};

/// Ranks the categories by how much they changed into the latest period.
///
/// # Arguments
/// - `top` - How many categories to list in each direction. Falls back to the config's `top_n`.
///
/// # Errors
/// - `SourceUnavailable` or `MalformedRecord` when the ledger cannot be loaded.
/// - `InsufficientHistory` when the data covers fewer than two periods.
pub async fn overview(
    config: &Config,
    loader: &dyn Loader,
    top: Option<usize>,
) -> Result<Out<ChangeReport>> {
    let ledger = load(config, loader).await?;
    let matrix = PeriodMatrix::build(&ledger);
    let report = change_report(&matrix, top.unwrap_or_else(|| config.top_n()))?;

    let mut message = format!(
        "Largest changes from {} to {}",
        report.previous, report.latest
    );
    if let Some(up) = report.increases.first() {
        message.push_str(&format!(", up: {} ({})", up.category, up.percent));
    }
    if let Some(down) = report.reductions.first() {
        message.push_str(&format!(", down: {} ({})", down.category, down.percent));
    }
    Ok(Out::new(message, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{to_rows, TestEnv};
    use crate::ErrorType;

    #[tokio::test]
    async fn test_overview() {
        let env = TestEnv::new().await;
        let out = overview(&env.config(), env.loader(), Some(2)).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.latest.to_string(), "2024-04");
        assert_eq!(report.increases.len(), 2);
        assert_eq!(report.increases[0].category, "Viagem");
        assert_eq!(report.reductions[0].category, "Saúde");
        assert!(out.message().contains("up: Viagem (+inf)"));
        assert!(out.message().contains("down: Saúde (-200.00%)"));
    }

    #[tokio::test]
    async fn test_overview_defaults_to_config_top_n() {
        let env = TestEnv::new().await;
        let out = overview(&env.config(), env.loader(), None).await.unwrap();
        assert_eq!(out.structure().unwrap().increases.len(), 5);
    }

    #[tokio::test]
    async fn test_overview_single_period() {
        let invoice = to_rows(&[
            &["data_pagamento", "valor", "categoria"],
            &["2024-01-10", "10", "Lazer"],
        ]);
        let statement = to_rows(&[&["Payment Date", "Amount", "Category"]]);
        let env = TestEnv::with_rows(invoice, statement).await;
        let err = overview(&env.config(), env.loader(), None)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InsufficientHistory);
    }
}
