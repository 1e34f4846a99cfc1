//! Sign in, sign out and account details.

use campus_eats_storefront::api::types::{Credentials, SignupRequest};
use campus_eats_storefront::services::{AddressService, session};
use tracing::info;

use super::{CommandResult, Context};

/// Sign in and persist the session.
///
/// # Errors
///
/// Returns an error if the username is blank or the session cannot be saved.
pub async fn login(ctx: &Context, username: &str, password: String) -> CommandResult {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username is required".into());
    }

    let credentials = Credentials {
        username: username.to_string(),
        password,
    };
    let mut session = ctx.session();
    let user = session
        .login(&ctx.api, ctx.config.fallback_policy, &credentials)
        .await?;

    info!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

/// Forget the persisted session.
///
/// # Errors
///
/// Returns an error if the session snapshot cannot be removed.
pub fn logout(ctx: &Context) -> CommandResult {
    let mut session = ctx.session();
    let was_signed_in = session.is_signed_in();
    session.logout()?;

    if was_signed_in {
        info!("Signed out");
    } else {
        info!("Not signed in");
    }
    Ok(())
}

/// Create an account. Does not sign in.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub async fn register(ctx: &Context, request: SignupRequest) -> CommandResult {
    let response = session::register(&ctx.api, ctx.config.fallback_policy, &request).await;
    info!("{}", response.message);
    Ok(())
}

/// Show the signed-in user and their saved addresses.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub async fn whoami(ctx: &Context) -> CommandResult {
    let session = ctx.session();
    let Some(user) = session.user() else {
        info!("Not signed in");
        return Ok(());
    };
    info!("{} <{}> ({})", user.name, user.email, user.username);

    let book = AddressService::new(&ctx.api, ctx.config.fallback_policy, session.token())
        .load()
        .await;
    for address in book.addresses() {
        let marker = if address.is_default { "*" } else { " " };
        info!(
            "{marker} {:<8} {}, {} {} {}",
            address.id.as_str(),
            address.street,
            address.city,
            address.state,
            address.zip_code
        );
    }
    Ok(())
}
