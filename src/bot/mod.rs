pub mod commands;
mod handler;
mod handlers;
mod state;
mod texts;
mod validate;

use crate::db::repo::Repo;
use anyhow::Result;
use hotels_client::HotelsClient;
use std::sync::Arc;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt};
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::BotCommandScope;
use teloxide::utils::command::BotCommands;
use tracing::info;

pub use commands::Command;
pub use handler::BotHandler;
use state::SessionStore;

/// Handler return type
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub async fn run(bot: Bot, repo: Arc<Repo>, hotels: Arc<HotelsClient>) -> Result<()> {
    info!("Starting Telegram Bot...");

    let sessions = SessionStore::new();
    let handler = BotHandler::new(repo, hotels, sessions);

    info!("✅ Bot initialized, starting dispatcher");

    // Register the command menu
    setup_commands(&bot).await;

    // Build the handler tree
    let handler_tree = build_handler_tree();

    Dispatcher::builder(bot, handler_tree)
        .dependencies(dptree::deps![handler])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// Build the update dispatch tree: commands first, then survey text
/// turns, plus the city-choice callbacks.
fn build_handler_tree(
) -> teloxide::dispatching::UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let command_handler = Message::filter_text()
        .filter_command::<Command>()
        .endpoint(handle_command);

    let message_handler = Message::filter_text().endpoint(handle_message);

    let callback_handler = Update::filter_callback_query().endpoint(handle_callback);

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(command_handler)
                .branch(message_handler),
        )
        .branch(callback_handler)
}

/// Handle a command
async fn handle_command(bot: Bot, msg: Message, cmd: Command, handler: BotHandler) -> HandlerResult {
    handler.handle_command(bot, msg, cmd).await?;
    Ok(())
}

/// Handle a free-text message (a survey answer or a plain greeting)
async fn handle_message(bot: Bot, msg: Message, text: String, handler: BotHandler) -> HandlerResult {
    handler.handle_text(bot, msg, text).await?;
    Ok(())
}

/// Handle a pressed inline button
async fn handle_callback(bot: Bot, q: CallbackQuery, handler: BotHandler) -> HandlerResult {
    handler.handle_callback(bot, q).await?;
    Ok(())
}

/// Publish the command menu so clients can offer completion.
async fn setup_commands(bot: &Bot) {
    if let Err(e) = bot
        .set_my_commands(Command::bot_commands())
        .scope(BotCommandScope::Default)
        .await
    {
        tracing::warn!("Failed to set bot commands: {:#}", e);
    } else {
        info!("✅ Registered bot commands");
    }
}
