use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, GatewayIntents, GuildId};
use tracing::{error, info, warn};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::commands;
use crate::config::Settings;
use crate::constants::messages::NOT_ADMIN;
use crate::db::WarningStore;
use crate::handlers::event_handler::event_handler;
use crate::services::classifier::SpamClassifier;

pub async fn run(
    settings: Settings,
    store: WarningStore,
    classifier: Box<dyn SpamClassifier>,
) -> Result<(), Error> {
    let data = Arc::new(Data::new(settings.clone(), store, classifier));

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::start::start(),
                commands::start::info(),
                commands::admin::logs(),
                commands::admin::ban(),
                commands::admin::unban(),
                commands::admin::cancel(),
                commands::admin::resetwarnings(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: None, // Disable prefix commands - only use slash commands
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command error: {:?}", error);
                            let _ = ctx.say(format!("Error: {}", error)).await;
                        }
                        poise::FrameworkError::CommandCheckFailed { ctx, .. } => {
                            let _ = ctx
                                .send(poise::CreateReply::default().content(NOT_ADMIN).ephemeral(true))
                                .await;
                        }
                        poise::FrameworkError::ArgumentParse { error, ctx, .. } => {
                            let _ = ctx.say(format!("Invalid argument: {}", error)).await;
                        }
                        poise::FrameworkError::UnknownCommand { .. } => {
                            // Prefix commands are disabled; mentions of the bot land here
                        }
                        err => {
                            error!("Framework error: {:?}", err);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as {}", ready.user.name);

                if data.settings.admin_ids.is_empty() {
                    warn!("ADMIN_IDS is empty: nobody can use admin commands or receive notices");
                }

                // Register commands per-guild when GUILD_ID is set, globally otherwise
                match data.settings.guild_id {
                    Some(guild_id) => {
                        let guild_id = GuildId::new(guild_id);
                        poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                            .await
                            .map_err(|e| {
                                error!("Failed to register guild commands in {}: {:?}", guild_id, e);
                                Error::Serenity(e)
                            })?;
                        info!(
                            "Registered {} commands in guild {}",
                            framework.options().commands.len(),
                            guild_id
                        );
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await
                            .map_err(|e| {
                                error!("Failed to register commands globally: {:?}", e);
                                Error::Serenity(e)
                            })?;
                        info!(
                            "Registered {} commands globally",
                            framework.options().commands.len()
                        );
                        info!("Note: Global commands can take up to 1 hour to appear in all servers");
                    }
                }

                Ok(data)
            })
        })
        .build();

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&settings.discord_token, intents)
        .framework(framework)
        .await
        .map_err(Error::Serenity)?;

    info!("Starting Discord client...");
    client.start().await.map_err(Error::Serenity)
}
