//! Check command - verifies the ledger without starting the server

use super::{LedgerArgs, load_config};

/// Load the configured ledger and report its team counts.
///
/// Fails when the ledger is corrupt; nothing is written either way.
pub async fn run(args: LedgerArgs) -> anyhow::Result<()> {
    let mut config = load_config()?;
    args.apply(&mut config);

    let team_service = crate::create_team_service(&config);
    let summary = team_service.summary().await.map_err(|e| {
        anyhow::anyhow!("{}: {}", config.ledger.path.display(), e)
    })?;

    println!(
        "{}: {} active, {} hidden",
        config.ledger.path.display(),
        summary.active,
        summary.hidden
    );

    Ok(())
}
