//! Concierge service: the core-facing contract used by the transport layer.
//!
//! Customer operations (`chat`, item changes, customer info) go through the
//! session state manager. Admin operations surface `NotFound` and other
//! typed errors directly instead of folding them into a reply.

use crate::config::ConciergeParams;
use crate::error::ConciergeError;
use crate::ports::evaluation_logger::{EvaluationLogger, NoEvaluationLogger};
use crate::ports::external_fetcher::{ExternalFetcher, NoExternalFetcher};
use crate::ports::knowledge_store::KnowledgeStore;
use crate::ports::notification::{NoNotificationChannel, NotificationChannel, NotificationOutbox};
use crate::use_cases::admin_query::{AdminAnswer, AdminQueryUseCase, AdminTarget};
use crate::use_cases::chat_turn::{ChatInput, ChatReply, ChatTurnUseCase};
use crate::use_cases::notify::NotificationWorkflow;
use crate::use_cases::retrieval::RetrievalRouter;
use crate::use_cases::session_manager::SessionStateManager;
use chrono::Utc;
use concierge_domain::{
    Booking, BookingId, BookingRepository, BookingStatus, Catalog, ChatEntry, CustomerInfo,
    DomainError, IntentExtractor, ItemId, ItemKind, ItineraryEngine, ItineraryView, Notification,
    Session, SessionId, SessionRepository, SessionSummary,
};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::info;

/// Full session projection for the admin view
#[derive(Debug, Clone)]
pub struct SessionDetails {
    pub session: Session,
    pub itinerary: ItineraryView,
    pub booking: Option<Booking>,
}

/// Booking plus the conversation that produced it
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub booking: Booking,
    pub chat_history: Vec<ChatEntry>,
}

/// Facade over the orchestration core.
pub struct ConciergeService {
    catalog: Arc<Catalog>,
    knowledge: Arc<dyn KnowledgeStore>,
    fetcher: Arc<dyn ExternalFetcher>,
    sessions: Arc<SessionStateManager>,
    bookings: Arc<dyn BookingRepository>,
    outbox: Arc<dyn NotificationOutbox>,
    channel: Arc<dyn NotificationChannel>,
    evaluation_logger: Arc<dyn EvaluationLogger>,
    extractor: IntentExtractor,
    params: ConciergeParams,
    /// Serializes booking status updates
    booking_lock: AsyncMutex<()>,
}

impl ConciergeService {
    pub fn new(
        catalog: Arc<Catalog>,
        knowledge: Arc<dyn KnowledgeStore>,
        sessions: Arc<dyn SessionRepository>,
        bookings: Arc<dyn BookingRepository>,
        outbox: Arc<dyn NotificationOutbox>,
    ) -> Self {
        Self {
            catalog,
            knowledge,
            fetcher: Arc::new(NoExternalFetcher),
            sessions: Arc::new(SessionStateManager::new(sessions)),
            bookings,
            outbox,
            channel: Arc::new(NoNotificationChannel),
            evaluation_logger: Arc::new(NoEvaluationLogger),
            extractor: IntentExtractor::new(),
            params: ConciergeParams::default(),
            booking_lock: AsyncMutex::new(()),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_fetcher(mut self, fetcher: Arc<dyn ExternalFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_notification_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_evaluation_logger(mut self, logger: Arc<dyn EvaluationLogger>) -> Self {
        self.evaluation_logger = logger;
        self
    }

    pub fn with_params(mut self, params: ConciergeParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_extractor(mut self, extractor: IntentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    // ==================== Accessors ====================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn params(&self) -> &ConciergeParams {
        &self.params
    }

    /// Names of the retrieval sources in the order they are consulted.
    pub fn retrieval_sources(&self) -> Vec<&'static str> {
        self.router().source_names()
    }

    fn engine(&self) -> ItineraryEngine<'_> {
        ItineraryEngine::new(&self.catalog).with_default_nights(self.params.default_nights)
    }

    fn router(&self) -> RetrievalRouter {
        RetrievalRouter::standard(
            self.knowledge.clone(),
            self.fetcher.clone(),
            &self.params.retrieval,
        )
    }

    fn notifications(&self) -> NotificationWorkflow {
        NotificationWorkflow::new(
            self.outbox.clone(),
            self.channel.clone(),
            self.params.notification.clone(),
        )
    }

    // ==================== Customer Operations ====================

    /// Process one customer message.
    ///
    /// Without a session id a new session is created. An unknown id is
    /// `NotFound`; starting over is the caller's decision.
    pub async fn chat(
        &self,
        message: &str,
        session_id: Option<&SessionId>,
    ) -> Result<ChatReply, ConciergeError> {
        let mut input = ChatInput::new(message);
        if let Some(id) = session_id {
            input = input.with_session(id.clone());
        }
        ChatTurnUseCase::new(
            self.sessions.clone(),
            self.catalog.clone(),
            self.extractor.clone(),
            Arc::new(self.router()),
            self.knowledge.clone(),
            self.bookings.clone(),
            Arc::new(self.notifications()),
            self.params.clone(),
        )
        .with_evaluation_logger(self.evaluation_logger.clone())
        .execute(input)
        .await
    }

    /// Start an empty session without a first message.
    pub async fn create_session(&self) -> Result<Session, ConciergeError> {
        self.sessions.create().await
    }

    /// Add a catalog item. `kind` is `flight`, `hotel` or `activity`.
    pub async fn add_item(
        &self,
        session_id: &SessionId,
        kind: &str,
        item_id: &str,
    ) -> Result<ItineraryView, ConciergeError> {
        let kind: ItemKind = kind.parse()?;
        let id = ItemId::parse_for(kind, item_id)?;
        let engine = self.engine();
        let ((), session) = self
            .sessions
            .update(session_id, |s| engine.add(s, kind, &id))
            .await?;
        info!(session_id = %session_id, kind = kind.as_str(), item_id = %id, "Item added");
        Ok(engine.view(&session))
    }

    /// Remove a catalog item; removing an absent item is a no-op.
    pub async fn remove_item(
        &self,
        session_id: &SessionId,
        kind: &str,
        item_id: &str,
    ) -> Result<ItineraryView, ConciergeError> {
        let kind: ItemKind = kind.parse()?;
        let id = ItemId::parse(item_id)?;
        let engine = self.engine();
        let (removed, session) = self
            .sessions
            .update(session_id, |s| engine.remove(s, kind, &id))
            .await?;
        info!(session_id = %session_id, item_id = %id, removed, "Item removal");
        Ok(engine.view(&session))
    }

    pub async fn get_itinerary(
        &self,
        session_id: &SessionId,
    ) -> Result<ItineraryView, ConciergeError> {
        let session = self.sessions.load(session_id).await?;
        Ok(self.engine().view(&session))
    }

    pub async fn set_customer_info(
        &self,
        session_id: &SessionId,
        email: &str,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<CustomerInfo, ConciergeError> {
        let customer = CustomerInfo::new(email, name, phone)?;
        let stored = customer.clone();
        self.sessions
            .update(session_id, move |s| {
                s.set_customer(stored);
                Ok(())
            })
            .await?;
        info!(session_id = %session_id, "Customer info saved");
        Ok(customer)
    }

    // ==================== Admin Operations ====================

    /// Session list read model, newest first.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ConciergeError> {
        self.sessions.summaries().await
    }

    pub async fn get_session_details(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionDetails, ConciergeError> {
        let session = self.sessions.load(session_id).await?;
        let booking = match session.booking_id() {
            Some(id) => self.bookings.load(id).await?,
            None => None,
        };
        Ok(SessionDetails {
            itinerary: self.engine().view(&session),
            session,
            booking,
        })
    }

    /// All bookings, newest first.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, ConciergeError> {
        let mut bookings = self.bookings.list().await?;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn load_booking(&self, booking_id: &str) -> Result<Booking, ConciergeError> {
        let not_found = || DomainError::not_found("Booking", booking_id.trim());
        let id = BookingId::parse(booking_id).map_err(|_| not_found())?;
        Ok(self.bookings.load(&id).await?.ok_or_else(not_found)?)
    }

    pub async fn get_booking(&self, booking_id: &str) -> Result<BookingDetails, ConciergeError> {
        let booking = self.load_booking(booking_id).await?;
        let chat_history = match self.sessions.load(&booking.session_id).await {
            Ok(session) => session.history().to_vec(),
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(BookingDetails {
            booking,
            chat_history,
        })
    }

    /// Move a booking to `completed` or `cancelled`.
    ///
    /// Repeating the current status succeeds without a write.
    pub async fn update_booking_status(
        &self,
        booking_id: &str,
        status: &str,
    ) -> Result<Booking, ConciergeError> {
        let next: BookingStatus = status.parse()?;
        if next == BookingStatus::Confirmed {
            return Err(DomainError::InvalidStatus(
                "status can only be set to completed or cancelled".to_string(),
            )
            .into());
        }
        let _guard = self.booking_lock.lock().await;
        let mut booking = self.load_booking(booking_id).await?;
        if booking.update_status(next, Utc::now())? {
            self.bookings.save(&booking).await?;
            info!(booking_id = %booking.id, status = next.as_str(), "Booking status updated");
        }
        Ok(booking)
    }

    /// Answer an admin question about one session, one booking, or all sessions.
    pub async fn admin_query(
        &self,
        question: &str,
        target: AdminTarget,
    ) -> Result<AdminAnswer, ConciergeError> {
        AdminQueryUseCase::new(
            self.sessions.clone(),
            self.bookings.clone(),
            self.catalog.clone(),
            self.knowledge.clone(),
            self.params.clone(),
        )
        .execute(question, target)
        .await
    }

    /// Admin notification feed, newest first.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, ConciergeError> {
        self.notifications().list().await
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<Notification, ConciergeError> {
        self.notifications().mark_read(id).await
    }

    /// Retry undelivered notifications. Returns how many were delivered.
    pub async fn retry_pending_notifications(&self) -> Result<usize, ConciergeError> {
        self.notifications().retry_pending().await
    }
}
