use crate::context::AppContext;

/// The signed-in user's id, or a sign-in hint as the error.
pub async fn require_user_id(ctx: &AppContext) -> anyhow::Result<String> {
    ctx.service
        .session()
        .await
        .map(|session| session.user.id)
        .ok_or_else(|| anyhow::anyhow!("not signed in; run 'tly auth sign-in' first"))
}
