//! `BotHandler`: command routing and the survey dispatcher.
//!
//! The dispatcher owns the re-prompt/advance decision: step handlers
//! return a [`StepOutcome`] or a [`StepError`] and never talk to Telegram
//! themselves (except for the terminal search report).

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia, InputMediaPhoto, User,
};
use tracing::{debug, error, info, warn};
use url::Url;

use super::handlers::survey::StepOutcome;
use super::handlers::{history, search, survey};
use super::state::{SearchKind, Session, SessionStore, SurveyStep};
use super::{texts, Command};
use crate::db::repo::Repo;
use hotels_client::{CityCandidate, HotelsClient};

/// Callback data prefix for the city-choice buttons
const CITY_CALLBACK_PREFIX: &str = "city:";

#[derive(Clone)]
pub struct BotHandler {
    pub(crate) repo: Arc<Repo>,
    pub(crate) hotels: Arc<HotelsClient>,
    pub(crate) sessions: SessionStore,
}

impl BotHandler {
    pub fn new(repo: Arc<Repo>, hotels: Arc<HotelsClient>, sessions: SessionStore) -> Self {
        Self {
            repo,
            hotels,
            sessions,
        }
    }

    // ==================== Commands ====================

    pub async fn handle_command(&self, bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
        let chat_id = msg.chat.id;
        let Some(user) = msg.from.clone() else {
            return Ok(());
        };

        info!(
            "Received command from user {} in chat {}: {:?}",
            user.id, chat_id, cmd
        );

        // Record the user; the bot keeps answering if the write fails
        if let Err(e) = self
            .repo
            .ensure_user(user.id.0 as i64, user.username.clone())
            .await
        {
            error!("Failed to upsert user {}: {:#}", user.id, e);
        }

        match cmd {
            Command::Start | Command::Help => self.greet(&bot, chat_id, &user).await,
            Command::LowPrice => {
                self.start_survey(&bot, chat_id, user.id, SearchKind::CheapestFirst)
                    .await
            }
            Command::HighPrice => {
                self.start_survey(&bot, chat_id, user.id, SearchKind::PriciestFirst)
                    .await
            }
            Command::BestDeal => {
                self.start_survey(&bot, chat_id, user.id, SearchKind::BestDeal)
                    .await
            }
            Command::History => self.handle_history(&bot, chat_id, user.id).await,
            Command::Delete => self.handle_delete(&bot, chat_id, user.id).await,
        }
    }

    async fn greet(&self, bot: &Bot, chat_id: ChatId, user: &User) -> ResponseResult<()> {
        let name = user
            .username
            .clone()
            .unwrap_or_else(|| user.first_name.clone());
        bot.send_message(chat_id, texts::greeting(&name)).await?;
        Ok(())
    }

    /// Start a fresh conversation, discarding any in-flight one for this
    /// user in this chat.
    async fn start_survey(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        user_id: UserId,
        kind: SearchKind,
    ) -> ResponseResult<()> {
        self.sessions.start(chat_id, user_id, kind).await;
        debug!("Started {:?} survey for user {}", kind, user_id);

        let prompt = match kind {
            SearchKind::CheapestFirst => texts::ASK_CITY_LOWPRICE,
            SearchKind::PriciestFirst => texts::ASK_CITY_HIGHPRICE,
            SearchKind::BestDeal => texts::ASK_DISTANCE_MIN,
        };
        bot.send_message(chat_id, prompt).await?;
        Ok(())
    }

    // ==================== Survey turns ====================

    /// One free-text turn of an active survey. Messages outside a survey
    /// only trigger the greeting.
    pub async fn handle_text(&self, bot: Bot, msg: Message, text: String) -> ResponseResult<()> {
        let chat_id = msg.chat.id;
        let Some(user) = msg.from.clone() else {
            return Ok(());
        };

        let Some(session) = self.sessions.get(chat_id, user.id).await else {
            if text.to_lowercase() == "привет" {
                return self.greet(&bot, chat_id, &user).await;
            }
            return Ok(());
        };

        // The per-session lock serializes turns of this conversation
        let mut session = session.lock().await;
        debug!(
            "Survey turn from user {} at {:?}: {:?}",
            user.id, session.step, text
        );

        match self.survey_step(&mut session, &text).await {
            Ok(StepOutcome::Advance { step, prompt }) => {
                session.step = step;
                bot.send_message(chat_id, prompt).await?;
            }
            Ok(StepOutcome::ChooseCity { candidates }) => {
                session.step = SurveyStep::CityChoice;
                bot.send_message(chat_id, texts::CHOOSE_CITY)
                    .reply_markup(city_keyboard(&candidates))
                    .await?;
            }
            Ok(StepOutcome::Complete) => {
                self.complete(&bot, chat_id, &user, &mut session).await?;
            }
            Err(err) => {
                debug!(
                    "Rejected {:?} input from user {} at {:?}: {:?}",
                    err.kind(),
                    user.id,
                    session.step,
                    text
                );
                bot.send_message(chat_id, err.message().to_string()).await?;
            }
        }

        Ok(())
    }

    /// A pressed city button.
    pub async fn handle_callback(&self, bot: Bot, q: CallbackQuery) -> ResponseResult<()> {
        let city_id = q
            .data
            .as_deref()
            .and_then(|data| data.strip_prefix(CITY_CALLBACK_PREFIX))
            .map(str::to_string);
        let chat = q.message.as_ref().map(|message| message.chat().id);
        let user_id = q.from.id;

        // Always answer the query so the client stops its spinner
        bot.answer_callback_query(q.id).await?;

        let Some(city_id) = city_id else {
            return Ok(());
        };
        let Some(chat_id) = chat else {
            warn!("City callback without a message from user {}", user_id);
            return Ok(());
        };

        let Some(session) = self.sessions.get(chat_id, user_id).await else {
            debug!("City callback without an active survey from user {}", user_id);
            return Ok(());
        };

        let mut session = session.lock().await;
        if session.step != SurveyStep::CityChoice {
            // A stale button from an earlier keyboard
            debug!(
                "Ignoring city callback at step {:?} from user {}",
                session.step, user_id
            );
            return Ok(());
        }

        if let StepOutcome::Advance { step, prompt } = survey::choose_city(&mut session, &city_id) {
            session.step = step;
            bot.send_message(chat_id, prompt).await?;
        }

        Ok(())
    }

    // ==================== Terminal ====================

    /// Terminal step: run the search, report, persist, drop the session.
    async fn complete(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        user: &User,
        session: &mut Session,
    ) -> ResponseResult<()> {
        let kind = session.kind;

        match session.plan() {
            Some(plan) => {
                bot.send_message(chat_id, texts::COLLECTING).await?;

                match search::run_search(&self.hotels, &plan).await {
                    Ok(results) => {
                        if results.is_empty() {
                            bot.send_message(chat_id, texts::NOTHING_FOUND).await?;
                        } else {
                            for hotel in &results {
                                self.report_hotel(bot, chat_id, hotel).await?;
                            }
                        }

                        // History is written even for an empty result set.
                        // A failed write is logged but never rolls back the
                        // results the user already received.
                        let rendered = history::format_results(&results);
                        if let Err(e) = self
                            .repo
                            .append_history(
                                user.id.0 as i64,
                                user.username.clone(),
                                kind.command(),
                                rendered,
                            )
                            .await
                        {
                            error!("Failed to write history for user {}: {:#}", user.id, e);
                        } else {
                            info!("Recorded {} search for user {}", kind.command(), user.id);
                        }
                    }
                    Err(e) => {
                        error!("Search failed for user {}: {:#}", user.id, e);
                        bot.send_message(chat_id, texts::SEARCH_FAILED).await?;
                    }
                }
            }
            None => {
                // Unreachable through the step table; recover anyway
                error!("Survey of user {} completed with an incomplete draft", user.id);
                bot.send_message(chat_id, texts::GENERIC_FAILURE).await?;
            }
        }

        bot.send_message(chat_id, texts::COMMANDS_HINT).await?;
        self.sessions.remove(chat_id, user.id).await;
        Ok(())
    }

    /// Send one hotel: a text block, or a media group when photos were
    /// requested (the first photo carries the caption).
    async fn report_hotel(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        hotel: &search::HotelResult,
    ) -> ResponseResult<()> {
        let caption = search::hotel_caption(hotel);

        let mut media: Vec<InputMedia> = Vec::new();
        for link in &hotel.images {
            let url = match Url::parse(link) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping malformed image URL {:?}: {}", link, e);
                    continue;
                }
            };

            let mut photo = InputMediaPhoto::new(InputFile::url(url));
            if media.is_empty() {
                photo = photo.caption(caption.clone());
            }
            media.push(InputMedia::Photo(photo));
        }

        if media.is_empty() {
            bot.send_message(chat_id, caption).await?;
        } else {
            bot.send_media_group(chat_id, media).await?;
        }

        Ok(())
    }
}

/// One button per city candidate; the callback carries the region id.
fn city_keyboard(candidates: &[CityCandidate]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(candidates.iter().map(|city| {
        vec![InlineKeyboardButton::callback(
            city.name.clone(),
            format!("{}{}", CITY_CALLBACK_PREFIX, city.id),
        )]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_keyboard_layout() {
        let candidates = vec![
            CityCandidate {
                name: "Paris".to_string(),
                id: "2734".to_string(),
            },
            CityCandidate {
                name: "Paris, TX".to_string(),
                id: "9001".to_string(),
            },
        ];

        let keyboard = city_keyboard(&candidates);
        // One candidate per row
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(keyboard.inline_keyboard[0].len(), 1);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Paris");
        assert_eq!(keyboard.inline_keyboard[1][0].text, "Paris, TX");
    }
}
