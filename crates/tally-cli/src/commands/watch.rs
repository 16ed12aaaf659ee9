use tally_backend::changes::Table;
use tokio::sync::broadcast::error::RecvError;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::WatchArgs;
use crate::context::AppContext;
use crate::output::output;

/// Stream change events for one table until Ctrl-C.
///
/// Each event prints as one record in the selected format, so
/// `tly --format raw watch audits` yields line-delimited JSON.
pub async fn handle(args: &WatchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let table = args
        .table
        .parse::<Table>()
        .map_err(|error| anyhow::anyhow!(error))?;

    let mut feed = ctx.service.subscribe(table).await;
    if !flags.quiet {
        eprintln!("watching {table}; Ctrl-C to stop");
    }

    loop {
        tokio::select! {
            event = feed.recv() => match event {
                Ok(event) => output(&event, flags.format)?,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "change feed lagging; events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
