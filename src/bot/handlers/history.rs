//! Search-history commands and the persisted rendering of results.

use teloxide::prelude::*;
use tracing::{error, info};

use super::search::{hotel_caption, HotelResult};
use crate::bot::{texts, BotHandler};

/// Render results into the text blob stored with a history record: one
/// numbered block per hotel, an empty string for an empty result set.
pub(crate) fn format_results(results: &[HotelResult]) -> String {
    let mut text = String::new();
    for (index, hotel) in results.iter().enumerate() {
        text.push_str(&format!("#{} {}\n\n", index + 1, hotel_caption(hotel)));
    }
    text
}

impl BotHandler {
    /// `/history`: replay all stored searches, oldest first.
    pub(crate) async fn handle_history(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        user_id: UserId,
    ) -> ResponseResult<()> {
        match self.repo.list_history(user_id.0 as i64).await {
            Ok(records) if records.is_empty() => {
                bot.send_message(chat_id, texts::NO_HISTORY).await?;
            }
            Ok(records) => {
                for record in records {
                    bot.send_message(chat_id, format!("{}:\n{}", record.command, record.value))
                        .await?;
                }
                bot.send_message(chat_id, texts::HISTORY_DELETE_HINT).await?;
            }
            Err(e) => {
                error!("Failed to list history for user {}: {:#}", user_id, e);
                bot.send_message(chat_id, texts::GENERIC_FAILURE).await?;
            }
        }

        Ok(())
    }

    /// `/delete`: wipe the user's history. Succeeds on an empty history too.
    pub(crate) async fn handle_delete(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        user_id: UserId,
    ) -> ResponseResult<()> {
        match self.repo.delete_history(user_id.0 as i64).await {
            Ok(removed) => {
                info!("Removed {} history records for user {}", removed, user_id);
                bot.send_message(chat_id, texts::HISTORY_CLEARED).await?;
                bot.send_message(chat_id, texts::COMMANDS_HINT).await?;
            }
            Err(e) => {
                error!("Failed to delete history for user {}: {:#}", user_id, e);
                bot.send_message(chat_id, texts::GENERIC_FAILURE).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(name: &str) -> HotelResult {
        HotelResult {
            name: name.to_string(),
            address: "Main st. 1".to_string(),
            distance_value: 2.5,
            distance_unit: "MILE".to_string(),
            price: 99.0,
            currency_code: "USD".to_string(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_format_results_empty() {
        assert_eq!(format_results(&[]), "");
    }

    #[test]
    fn test_format_results_numbers_blocks() {
        let rendered = format_results(&[hotel("One"), hotel("Two")]);

        assert!(rendered.starts_with("#1 Название: One\n"));
        assert!(rendered.contains("#2 Название: Two\n"));
        assert!(rendered.contains("Адрес: Main st. 1\n"));
        assert!(rendered.contains("До центра: 2.5 MILE\n"));
        assert!(rendered.contains("Цена: 99 USD"));

        // Blocks are separated by a blank line
        assert_eq!(rendered.matches("\n\n").count(), 2);
    }
}
