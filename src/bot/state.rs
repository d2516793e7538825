//! Per-user conversation state for the hotel-search survey.
//!
//! Every active `(ChatId, UserId)` pair owns one [`Session`]: the survey
//! step it is waiting on plus the parameters collected so far. Sessions
//! live in memory only; a restart drops all in-flight conversations while
//! the search history stays in the database.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::sync::{Mutex, RwLock};

/// Which search command started the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// `/lowprice` - cheapest offers first
    CheapestFirst,
    /// `/highprice` - priciest offers first
    PriciestFirst,
    /// `/bestdeal` - filtered by distance from the center
    BestDeal,
}

impl SearchKind {
    /// The command string persisted with each history record.
    pub fn command(&self) -> &'static str {
        match self {
            SearchKind::CheapestFirst => "/lowprice",
            SearchKind::PriciestFirst => "/highprice",
            SearchKind::BestDeal => "/bestdeal",
        }
    }
}

/// One step of the survey; each waits for exactly one piece of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyStep {
    DistanceMin,
    DistanceMax,
    City,
    CityChoice,
    CheckIn,
    CheckOut,
    HotelCount,
    PhotoChoice,
    PhotoCount,
}

/// Search parameters collected incrementally across turns.
///
/// Fields are written in strict step order and stay `None` until their
/// producing step has run.
#[derive(Debug, Clone, Default)]
pub struct SearchDraft {
    pub city: Option<String>,
    pub city_id: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub hotel_count: Option<u8>,
    pub with_photos: Option<bool>,
    pub photo_count: Option<u8>,
    pub distance_min: Option<u32>,
    pub distance_max: Option<u32>,
}

/// A fully collected survey, ready to be turned into an API request.
#[derive(Debug, Clone)]
pub struct SearchPlan {
    pub kind: SearchKind,
    pub city_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub hotel_count: usize,
    /// 0 when the user declined photos
    pub photo_count: usize,
    /// Strict exclusive bounds, present only for BestDeal
    pub distance: Option<(f64, f64)>,
}

/// One user's conversation: current step plus the draft.
#[derive(Debug)]
pub struct Session {
    pub kind: SearchKind,
    pub step: SurveyStep,
    pub draft: SearchDraft,
}

impl Session {
    /// A fresh conversation. BestDeal collects its distance bounds before
    /// asking for the city; the other kinds start at the city right away.
    pub fn new(kind: SearchKind) -> Self {
        let step = match kind {
            SearchKind::BestDeal => SurveyStep::DistanceMin,
            _ => SurveyStep::City,
        };

        Self {
            kind,
            step,
            draft: SearchDraft::default(),
        }
    }

    /// Validate field presence and produce the plan the orchestrator runs.
    ///
    /// Returns `None` if any step has not written its field yet, so an
    /// incomplete draft can never reach the search.
    pub fn plan(&self) -> Option<SearchPlan> {
        let draft = &self.draft;

        let photo_count = match draft.with_photos? {
            true => usize::from(draft.photo_count?),
            false => 0,
        };

        let distance = match self.kind {
            SearchKind::BestDeal => Some((
                f64::from(draft.distance_min?),
                f64::from(draft.distance_max?),
            )),
            _ => None,
        };

        Some(SearchPlan {
            kind: self.kind,
            city_id: draft.city_id.clone()?,
            check_in: draft.check_in?,
            check_out: draft.check_out?,
            hotel_count: usize::from(draft.hotel_count?),
            photo_count,
            distance,
        })
    }
}

/// Keyed store of active conversations.
///
/// The outer map is only locked to look a session up or to insert/remove
/// one; each session sits behind its own `Mutex`, which serializes turns
/// per key for the whole handler run (including the search calls) without
/// ever blocking other users' conversations.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<(ChatId, UserId), Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh conversation, discarding any previous one for the key.
    pub async fn start(&self, chat_id: ChatId, user_id: UserId, kind: SearchKind) {
        let session = Arc::new(Mutex::new(Session::new(kind)));
        self.inner.write().await.insert((chat_id, user_id), session);
    }

    pub async fn get(&self, chat_id: ChatId, user_id: UserId) -> Option<Arc<Mutex<Session>>> {
        self.inner.read().await.get(&(chat_id, user_id)).cloned()
    }

    pub async fn remove(&self, chat_id: ChatId, user_id: UserId) {
        self.inner.write().await.remove(&(chat_id, user_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> SearchDraft {
        SearchDraft {
            city: Some("Paris".to_string()),
            city_id: Some("2734".to_string()),
            check_in: NaiveDate::from_ymd_opt(2099, 1, 1),
            check_out: NaiveDate::from_ymd_opt(2099, 1, 5),
            hotel_count: Some(3),
            with_photos: Some(false),
            photo_count: None,
            distance_min: None,
            distance_max: None,
        }
    }

    #[test]
    fn test_bestdeal_starts_with_distance() {
        assert_eq!(
            Session::new(SearchKind::BestDeal).step,
            SurveyStep::DistanceMin
        );
        assert_eq!(
            Session::new(SearchKind::CheapestFirst).step,
            SurveyStep::City
        );
        assert_eq!(
            Session::new(SearchKind::PriciestFirst).step,
            SurveyStep::City
        );
    }

    #[test]
    fn test_plan_requires_all_fields() {
        let mut session = Session::new(SearchKind::CheapestFirst);
        assert!(session.plan().is_none());

        session.draft = complete_draft();
        let plan = session.plan().expect("complete draft must plan");
        assert_eq!(plan.city_id, "2734");
        assert_eq!(plan.hotel_count, 3);
        assert_eq!(plan.photo_count, 0);
        assert!(plan.distance.is_none());

        // Dropping a single field invalidates the plan again
        session.draft.check_out = None;
        assert!(session.plan().is_none());
    }

    #[test]
    fn test_plan_photo_count_gated_by_choice() {
        let mut session = Session::new(SearchKind::CheapestFirst);
        session.draft = complete_draft();
        session.draft.with_photos = Some(true);

        // "yes" without a count is incomplete
        assert!(session.plan().is_none());

        session.draft.photo_count = Some(4);
        assert_eq!(session.plan().unwrap().photo_count, 4);
    }

    #[test]
    fn test_plan_bestdeal_requires_distance_bounds() {
        let mut session = Session::new(SearchKind::BestDeal);
        session.draft = complete_draft();
        assert!(session.plan().is_none());

        session.draft.distance_min = Some(1);
        session.draft.distance_max = Some(5);
        let plan = session.plan().unwrap();
        assert_eq!(plan.distance, Some((1.0, 5.0)));
    }

    #[tokio::test]
    async fn test_store_new_command_overwrites_session() {
        let store = SessionStore::new();
        let chat = ChatId(10);
        let user = UserId(20);

        store.start(chat, user, SearchKind::CheapestFirst).await;
        {
            let session = store.get(chat, user).await.unwrap();
            let mut session = session.lock().await;
            session.draft.city = Some("Paris".to_string());
        }

        // A fresh top-level command discards the in-flight conversation
        store.start(chat, user, SearchKind::BestDeal).await;
        let session = store.get(chat, user).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.kind, SearchKind::BestDeal);
        assert_eq!(session.step, SurveyStep::DistanceMin);
        assert!(session.draft.city.is_none());
    }

    #[tokio::test]
    async fn test_store_keys_are_independent() {
        let store = SessionStore::new();
        store
            .start(ChatId(1), UserId(1), SearchKind::CheapestFirst)
            .await;

        assert!(store.get(ChatId(1), UserId(2)).await.is_none());
        assert!(store.get(ChatId(2), UserId(1)).await.is_none());

        store.remove(ChatId(1), UserId(1)).await;
        assert!(store.get(ChatId(1), UserId(1)).await.is_none());
    }
}
