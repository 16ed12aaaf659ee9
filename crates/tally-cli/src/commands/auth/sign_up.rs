use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct SignUpResponse {
    user_id: String,
    email: String,
    role: &'static str,
    expires_at: String,
}

pub async fn run(
    email: &str,
    password: &str,
    name: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let spinner = Progress::spinner("creating account");
    let session = match ctx.service.sign_up(email, password, name).await {
        Ok(session) => {
            spinner.finish_clear();
            session
        }
        Err(error) => {
            spinner.finish_err("sign-up failed");
            return Err(error.into());
        }
    };

    output(
        &SignUpResponse {
            user_id: session.user.id,
            email: session.user.email,
            // New accounts always start as auditors.
            role: "auditor",
            expires_at: session.expires_at.to_rfc3339(),
        },
        flags.format,
    )
}
