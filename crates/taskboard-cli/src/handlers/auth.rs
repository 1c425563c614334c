use serde_json::json;
use taskboard_client::controllers::auth;
use taskboard_client::AuthOutcome;
use taskboard_core::{FormField, TaskboardError, TaskboardResult};
use taskboard_domain::{AuthForm, AuthFormKind, AuthRequest};

use crate::context::CliContext;
use crate::output;

pub async fn login(ctx: &mut CliContext, username: String, password: String) -> anyhow::Result<()> {
    let mut form = AuthForm::new(AuthFormKind::Login);
    form.set(FormField::Username, username);
    form.set(FormField::Password, password);
    let request = submit(&mut form)?;

    match auth::perform(ctx.services(), &request).await? {
        AuthOutcome::SignedIn(user) => {
            ctx.sign_in(user.clone())?;
            output::output_success(json!({
                "username": user.username,
                "email": user.email,
                "role": user.role,
            }));
        }
        AuthOutcome::Message(message) => output::output_success(json!({ "message": message })),
    }
    Ok(())
}

pub fn logout(ctx: &mut CliContext) -> anyhow::Result<()> {
    let username = ctx.session.current().map(|user| user.username.clone());
    ctx.sign_out()?;
    output::output_success(json!({ "signed_out": username }));
    Ok(())
}

pub async fn whoami(ctx: &mut CliContext) -> anyhow::Result<()> {
    let role = ctx.role().await?;
    let user = ctx.require_user()?;
    output::output_success(json!({
        "username": user.username,
        "email": user.email,
        "role": role,
    }));
    Ok(())
}

pub async fn register(
    ctx: &CliContext,
    username: String,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let mut form = AuthForm::new(AuthFormKind::Register);
    form.set(FormField::Username, username);
    form.set(FormField::Email, email);
    form.set(FormField::Password, password.clone());
    form.set(FormField::ConfirmPassword, password);
    let strength = form.strength();
    let request = submit(&mut form)?;

    let message = expect_message(auth::perform(ctx.services(), &request).await?)?;
    output::output_success(json!({
        "message": message,
        "password_strength": strength.map(|s| s.describe()),
    }));
    Ok(())
}

pub async fn forgot_password(ctx: &CliContext, email: String) -> anyhow::Result<()> {
    let mut form = AuthForm::new(AuthFormKind::ForgotPassword);
    form.set(FormField::Email, email);
    let request = submit(&mut form)?;

    let message = expect_message(auth::perform(ctx.services(), &request).await?)?;
    output::output_success(json!({ "message": message }));
    Ok(())
}

pub async fn reset_password(ctx: &CliContext, token: String, password: String) -> anyhow::Result<()> {
    let mut form = AuthForm::reset_password(Some(token));
    form.set(FormField::Password, password.clone());
    form.set(FormField::ConfirmPassword, password);
    let request = submit(&mut form)?;

    let message = expect_message(auth::perform(ctx.services(), &request).await?)?;
    output::output_success(json!({ "message": message }));
    Ok(())
}

fn submit(form: &mut AuthForm) -> TaskboardResult<AuthRequest> {
    form.submit()
        .ok_or_else(|| TaskboardError::InvalidInput(form.errors.clone()))
}

fn expect_message(outcome: AuthOutcome) -> TaskboardResult<String> {
    match outcome {
        AuthOutcome::Message(message) => Ok(message),
        AuthOutcome::SignedIn(_) => Err(TaskboardError::Internal(
            "Unexpected sign-in response".to_string(),
        )),
    }
}
