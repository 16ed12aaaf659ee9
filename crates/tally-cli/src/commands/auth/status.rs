use serde::Serialize;
use tally_backend::session_store;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    user_id: Option<String>,
    email: Option<String>,
    role: Option<String>,
    expires_at: Option<String>,
    expires_in_minutes: Option<i64>,
    session_source: Option<String>,
    note: Option<String>,
}

pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let status = match ctx.service.session().await {
        Some(session) => {
            let role = ctx
                .service
                .get_profile(&session.user.id)
                .await
                .ok()
                .map(|profile| profile.role.as_str().to_string());
            let expires_in_minutes = session
                .expires_at
                .signed_duration_since(chrono::Utc::now())
                .num_minutes();

            AuthStatusResponse {
                authenticated: true,
                user_id: Some(session.user.id),
                email: Some(session.user.email),
                role,
                expires_at: Some(session.expires_at.to_rfc3339()),
                expires_in_minutes: Some(expires_in_minutes),
                session_source: session_store::detect_source(),
                note: None,
            }
        }
        None => AuthStatusResponse {
            authenticated: false,
            user_id: None,
            email: None,
            role: None,
            expires_at: None,
            expires_in_minutes: None,
            session_source: None,
            note: Some("not signed in".into()),
        },
    };

    output(&status, flags.format)
}
