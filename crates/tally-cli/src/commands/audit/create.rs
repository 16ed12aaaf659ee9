use serde::Serialize;
use tally_core::entities::{Audit, AuditLocation, Coordinates};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuditResponse {
    audit: Audit,
}

#[allow(clippy::too_many_arguments)]
pub async fn run(
    template: &str,
    store: &str,
    address: &str,
    lat: Option<f64>,
    lon: Option<f64>,
    assign: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    // clap enforces that --lat and --lon come as a pair.
    let coordinates = match (lat, lon) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let location = AuditLocation {
        store_name: store.to_string(),
        address: address.to_string(),
        coordinates,
    };

    let audit = ctx
        .service
        .create_audit(template, location, assign.map(str::to_string))
        .await?;
    output(&AuditResponse { audit }, flags.format)
}
