//! Login, password reset and logout.

use anyhow::Result;

use trolley_track::notify::Notice;
use trolley_track::session::{self, Role};
use trolley_track::ui::prompt::Prompter;

use super::{Context, reported};

const ROLES: [Role; 2] = [Role::Admin, Role::Operator];

fn choose_role(prompter: &dyn Prompter, given: Option<&str>) -> Result<String> {
    if let Some(role) = given {
        return Ok(role.to_string());
    }
    let items: Vec<String> = ROLES.iter().map(|r| r.to_string()).collect();
    let idx = prompter.select("Role", &items, 0)?;
    Ok(items[idx].clone())
}

pub async fn cmd_login(ctx: &Context, role: Option<&str>, name: Option<&str>) -> Result<()> {
    let api = ctx.api()?;
    let role = choose_role(&ctx.prompter, role)?;
    let name = match name {
        Some(name) => name.to_string(),
        None => ctx.prompter.input("Name", None)?,
    };
    let password = ctx.prompter.password("Password")?;

    match session::login(&api, &role, &name, &password).await {
        Ok(user) => {
            ctx.session().save(&user)?;
            ctx.notifier()
                .notify(Notice::success("Welcome", format!("Logged in as {} ({})", user.name, user.role)));
            Ok(())
        }
        Err(err) => {
            ctx.notifier().notify(Notice::error(
                "Login Failed",
                err.user_message("Login failed. Please try again."),
            ));
            Err(reported(err))
        }
    }
}

pub async fn cmd_reset_password(ctx: &Context, role: Option<&str>) -> Result<()> {
    let api = ctx.api()?;
    let role = choose_role(&ctx.prompter, role)?;
    let new_password = ctx.prompter.password("New password")?;
    let confirm_password = ctx.prompter.password("Confirm new password")?;

    match session::reset_password(&api, &role, &new_password, &confirm_password).await {
        Ok(message) => {
            ctx.notifier().notify(Notice::success("Success", message));
            Ok(())
        }
        Err(err) => {
            ctx.notifier().notify(Notice::error(
                "Error",
                err.user_message("Failed to reset password. Please try again."),
            ));
            Err(reported(err))
        }
    }
}

pub fn cmd_logout(ctx: &Context) -> Result<()> {
    let store = ctx.session();
    if store.clear()? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
