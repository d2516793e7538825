//! Step handlers of the search survey.
//!
//! Each handler validates one answer. On success it writes the parsed
//! value into the draft and tells the dispatcher where to go next; on
//! failure it returns a [`StepError`] and the draft stays untouched, so
//! the user retries the same step.

use chrono::Local;
use hotels_client::CityCandidate;
use tracing::warn;

use crate::bot::state::{Session, SurveyStep};
use crate::bot::validate::{self, YesNo};
use crate::bot::{texts, BotHandler};

/// What the dispatcher should do after a step handler ran.
#[derive(Debug)]
pub(crate) enum StepOutcome {
    /// Store the transition and send the next prompt.
    Advance {
        step: SurveyStep,
        prompt: &'static str,
    },
    /// Show the city keyboard and wait for a button press.
    ChooseCity { candidates: Vec<CityCandidate> },
    /// The survey is complete; run the search.
    Complete,
}

/// Recoverable rejection of one answer. The conversation stays at the
/// current step in every case.
#[derive(Debug)]
pub(crate) enum StepError {
    /// The input does not have the expected shape
    Format(&'static str),
    /// The input parses but violates a bound or an earlier field
    Range(&'static str),
    /// A collaborator failed; its message is surfaced verbatim
    Upstream(String),
}

impl StepError {
    pub(crate) fn message(&self) -> &str {
        match self {
            StepError::Format(text) | StepError::Range(text) => text,
            StepError::Upstream(text) => text,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            StepError::Format(_) => "format",
            StepError::Range(_) => "range",
            StepError::Upstream(_) => "upstream",
        }
    }
}

type StepResult = Result<StepOutcome, StepError>;

impl BotHandler {
    /// The transition table: routes one free-text turn to the handler of
    /// the session's current step.
    pub(crate) async fn survey_step(&self, session: &mut Session, text: &str) -> StepResult {
        match session.step {
            SurveyStep::DistanceMin => distance_min(session, text),
            SurveyStep::DistanceMax => distance_max(session, text),
            SurveyStep::City => self.city(session, text).await,
            // The city is picked with a button, not with text
            SurveyStep::CityChoice => Err(StepError::Format(texts::CITY_CHOICE_HINT)),
            SurveyStep::CheckIn => check_in(session, text),
            SurveyStep::CheckOut => check_out(session, text),
            SurveyStep::HotelCount => hotel_count(session, text),
            SurveyStep::PhotoChoice => photo_choice(session, text),
            SurveyStep::PhotoCount => photo_count(session, text),
        }
    }

    /// City step: ask the API for candidate regions matching the name.
    async fn city(&self, session: &mut Session, text: &str) -> StepResult {
        let response = self.hotels.search_locations(text).await.map_err(|e| {
            warn!("City search for {:?} failed: {}", text, e);
            StepError::Upstream(texts::CITY_SERVER_ERROR.to_string())
        })?;

        let candidates = response.city_candidates();
        if candidates.is_empty() {
            return Err(StepError::Upstream(texts::CITY_NOT_FOUND.to_string()));
        }

        session.draft.city = Some(text.to_string());
        Ok(StepOutcome::ChooseCity { candidates })
    }
}

/// City-choice step: consumes the id from the pressed button. Any valid
/// selection is accepted unconditionally.
pub(crate) fn choose_city(session: &mut Session, city_id: &str) -> StepOutcome {
    session.draft.city_id = Some(city_id.to_string());
    StepOutcome::Advance {
        step: SurveyStep::CheckIn,
        prompt: texts::ASK_CHECK_IN,
    }
}

fn distance_min(session: &mut Session, text: &str) -> StepResult {
    let value =
        validate::parse_distance(text).ok_or(StepError::Format(texts::DISTANCE_INVALID))?;

    session.draft.distance_min = Some(value);
    Ok(StepOutcome::Advance {
        step: SurveyStep::DistanceMax,
        prompt: texts::ASK_DISTANCE_MAX,
    })
}

fn distance_max(session: &mut Session, text: &str) -> StepResult {
    let value =
        validate::parse_distance(text).ok_or(StepError::Format(texts::DISTANCE_INVALID))?;

    // An empty interval could never match any hotel
    if session.draft.distance_min.is_some_and(|min| value <= min) {
        return Err(StepError::Range(texts::DISTANCE_ORDER_INVALID));
    }

    session.draft.distance_max = Some(value);
    Ok(StepOutcome::Advance {
        step: SurveyStep::City,
        prompt: texts::ASK_CITY,
    })
}

fn check_in(session: &mut Session, text: &str) -> StepResult {
    let parts = validate::parse_date(text).ok_or(StepError::Format(texts::DATE_FORMAT_INVALID))?;
    let date = parts
        .to_date()
        .ok_or(StepError::Range(texts::DATE_IMPOSSIBLE))?;

    if date <= Local::now().date_naive() {
        return Err(StepError::Range(texts::CHECK_IN_NOT_FUTURE));
    }

    session.draft.check_in = Some(date);
    Ok(StepOutcome::Advance {
        step: SurveyStep::CheckOut,
        prompt: texts::ASK_CHECK_OUT,
    })
}

fn check_out(session: &mut Session, text: &str) -> StepResult {
    let parts = validate::parse_date(text).ok_or(StepError::Format(texts::DATE_FORMAT_INVALID))?;
    let date = parts
        .to_date()
        .ok_or(StepError::Range(texts::DATE_IMPOSSIBLE))?;

    if session.draft.check_in.is_some_and(|check_in| date <= check_in) {
        return Err(StepError::Range(texts::CHECK_OUT_NOT_AFTER));
    }

    session.draft.check_out = Some(date);
    Ok(StepOutcome::Advance {
        step: SurveyStep::HotelCount,
        prompt: texts::ASK_HOTEL_COUNT,
    })
}

fn hotel_count(session: &mut Session, text: &str) -> StepResult {
    let value =
        validate::parse_bounded_int(text, 5).ok_or(StepError::Format(texts::COUNT_INVALID))?;

    session.draft.hotel_count = Some(value);
    Ok(StepOutcome::Advance {
        step: SurveyStep::PhotoChoice,
        prompt: texts::ASK_PHOTO_CHOICE,
    })
}

fn photo_choice(session: &mut Session, text: &str) -> StepResult {
    match validate::parse_yes_no(text) {
        Some(YesNo::Yes) => {
            session.draft.with_photos = Some(true);
            Ok(StepOutcome::Advance {
                step: SurveyStep::PhotoCount,
                prompt: texts::ASK_PHOTO_COUNT,
            })
        }
        Some(YesNo::No) => {
            session.draft.with_photos = Some(false);
            Ok(StepOutcome::Complete)
        }
        None => Err(StepError::Format(texts::YES_NO_INVALID)),
    }
}

fn photo_count(session: &mut Session, text: &str) -> StepResult {
    let value =
        validate::parse_bounded_int(text, 5).ok_or(StepError::Format(texts::COUNT_INVALID))?;

    session.draft.photo_count = Some(value);
    Ok(StepOutcome::Complete)
}
