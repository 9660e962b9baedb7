pub mod admin;
pub mod start;

use crate::bot::data::Context;
use crate::bot::error::Error;

/// Command check: only configured admins pass
pub async fn is_admin(ctx: Context<'_>) -> Result<bool, Error> {
    Ok(ctx.data().is_admin(ctx.author().id.get()))
}
