//! User management — `trolley-track users`.

use anyhow::Result;
use chrono::Local;
use console::{Term, style};

use trolley_track::session::Page;
use trolley_track::ui::prompt::confirmation;
use trolley_track::ui::render;
use trolley_track::users::{UserStatus, UsersView};

use super::super::UsersCommands;
use super::{Context, reported};

pub async fn cmd_users(ctx: &Context, command: Option<UsersCommands>) -> Result<()> {
    ctx.open(Page::Users)?;
    let api = ctx.api()?;
    let mut view = UsersView::new(ctx.notifier());

    match command {
        None | Some(UsersCommands::List) => {
            view.load(&api).await;
            println!("{}", render::users_table(&view.rows()));
        }
        Some(UsersCommands::Watch) => {
            let term = Term::stdout();
            let interval = ctx.config.poll_interval();
            view.watch(
                &api,
                interval,
                async {
                    let _ = tokio::signal::ctrl_c().await;
                },
                |view| {
                    let _ = term.clear_screen();
                    println!("{}", render::users_table(&view.rows()));
                    println!();
                    println!(
                        "{}",
                        style(format!(
                            "Refreshed {} - every {}s, Ctrl+C to stop",
                            Local::now().format("%H:%M:%S"),
                            interval.as_secs()
                        ))
                        .dim()
                    );
                },
            )
            .await;
        }
        Some(UsersCommands::Activate { id }) => {
            view.toggle_status(&api, id, UserStatus::Inactive)
                .await
                .map_err(reported)?;
            println!("{}", render::users_table(&view.rows()));
        }
        Some(UsersCommands::Deactivate { id }) => {
            view.toggle_status(&api, id, UserStatus::Active)
                .await
                .map_err(reported)?;
            println!("{}", render::users_table(&view.rows()));
        }
        Some(UsersCommands::Delete { id }) => {
            let deleted = view
                .delete(
                    &api,
                    id,
                    confirmation(&ctx.prompter, "Are you sure you want to delete this user?"),
                )
                .await
                .map_err(reported)?;
            if deleted {
                println!("{}", render::users_table(&view.rows()));
            } else {
                println!("Cancelled.");
            }
        }
    }

    Ok(())
}
