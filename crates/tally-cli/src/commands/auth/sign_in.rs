use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct SignInResponse {
    user_id: String,
    email: String,
    expires_at: String,
}

pub async fn run(
    email: &str,
    password: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let spinner = Progress::spinner("signing in");
    let session = match ctx.service.sign_in(email, password).await {
        Ok(session) => {
            spinner.finish_clear();
            session
        }
        Err(error) => {
            spinner.finish_err("sign-in failed");
            return Err(error.into());
        }
    };

    output(
        &SignInResponse {
            user_id: session.user.id,
            email: session.user.email,
            expires_at: session.expires_at.to_rfc3339(),
        },
        flags.format,
    )
}
