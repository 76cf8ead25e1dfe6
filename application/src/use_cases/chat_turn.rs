//! Chat turn use case: the per-turn orchestration state machine.
//!
//! ```text
//! Receiving → Extracting → (Retrieving)? → Mutating → Composing → Persisted
//! ```
//!
//! Domain errors raised while mutating are folded into the reply. Only
//! storage failures abort a turn. On a successful confirmation the booking
//! is stored, the notification is queued and the evaluation logger is
//! called before the reply is returned.

use crate::config::ConciergeParams;
use crate::error::ConciergeError;
use crate::ports::evaluation_logger::{EvaluationEvent, EvaluationLogger, NoEvaluationLogger};
use crate::ports::knowledge_store::KnowledgeStore;
use crate::use_cases::compose;
use crate::use_cases::notify::NotificationWorkflow;
use crate::use_cases::retrieval::{RetrievalOutcome, RetrievalRouter};
use crate::use_cases::session_manager::SessionStateManager;
use chrono::Utc;
use concierge_domain::util::truncate_chars;
use concierge_domain::{
    Booking, BookingId, BookingRepository, Catalog, DocumentKind, DomainError, ExtractedIntent,
    Intent, IntentExtractor, ItemId, ItineraryEngine, Notification, Preferences, Role, Session,
    SessionId, TravelGuide,
};
use rand::Rng;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Phase of a customer turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Receiving,
    Extracting,
    Retrieving,
    Mutating,
    Composing,
    Persisted,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Receiving => "receiving",
            TurnPhase::Extracting => "extracting",
            TurnPhase::Retrieving => "retrieving",
            TurnPhase::Mutating => "mutating",
            TurnPhase::Composing => "composing",
            TurnPhase::Persisted => "persisted",
        }
    }
}

/// Phases a turn went through, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnTrace {
    phases: Vec<TurnPhase>,
}

impl TurnTrace {
    fn enter(&mut self, phase: TurnPhase) {
        debug!(phase = phase.as_str(), "Turn phase");
        self.phases.push(phase);
    }

    pub fn phases(&self) -> &[TurnPhase] {
        &self.phases
    }

    pub fn retrieved(&self) -> bool {
        self.phases.contains(&TurnPhase::Retrieving)
    }
}

/// Inbound customer message
#[derive(Debug, Clone)]
pub struct ChatInput {
    pub message: String,
    pub session_id: Option<SessionId>,
}

impl ChatInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// Reply to one customer turn
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub session_id: SessionId,
    pub reply_text: String,
    pub intent: Intent,
    pub preferences: Preferences,
    pub itinerary_summary_text: String,
    pub confirmed: bool,
    pub booking_id: Option<BookingId>,
    /// Retrieval result label when the turn retrieved (`knowledge_store`, `web`, `not_found`)
    pub retrieval: Option<&'static str>,
    pub trace: TurnTrace,
}

/// Result of the Mutating phase
enum Mutation {
    None,
    Added(Vec<(ItemId, Result<(), DomainError>)>),
    Confirmed(Booking),
    Rejected(DomainError),
}

/// Use case for processing one customer turn.
pub struct ChatTurnUseCase {
    sessions: Arc<SessionStateManager>,
    catalog: Arc<Catalog>,
    extractor: IntentExtractor,
    router: Arc<RetrievalRouter>,
    knowledge: Arc<dyn KnowledgeStore>,
    bookings: Arc<dyn BookingRepository>,
    notifications: Arc<NotificationWorkflow>,
    evaluation_logger: Arc<dyn EvaluationLogger>,
    params: ConciergeParams,
}

impl ChatTurnUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<SessionStateManager>,
        catalog: Arc<Catalog>,
        extractor: IntentExtractor,
        router: Arc<RetrievalRouter>,
        knowledge: Arc<dyn KnowledgeStore>,
        bookings: Arc<dyn BookingRepository>,
        notifications: Arc<NotificationWorkflow>,
        params: ConciergeParams,
    ) -> Self {
        Self {
            sessions,
            catalog,
            extractor,
            router,
            knowledge,
            bookings,
            notifications,
            evaluation_logger: Arc::new(NoEvaluationLogger),
            params,
        }
    }

    /// Create with an evaluation logger.
    pub fn with_evaluation_logger(mut self, logger: Arc<dyn EvaluationLogger>) -> Self {
        self.evaluation_logger = logger;
        self
    }

    fn engine(&self) -> ItineraryEngine<'_> {
        ItineraryEngine::new(&self.catalog).with_default_nights(self.params.default_nights)
    }

    fn validate(&self, message: &str) -> Result<(), DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::InvalidInput("message is empty".to_string()));
        }
        let len = message.chars().count();
        if len > self.params.chat.max_message_length {
            return Err(DomainError::InvalidInput(format!(
                "message is {} characters, the limit is {}",
                len, self.params.chat.max_message_length
            )));
        }
        Ok(())
    }

    /// Run one turn.
    pub async fn execute(&self, input: ChatInput) -> Result<ChatReply, ConciergeError> {
        let started = Instant::now();
        let mut trace = TurnTrace::default();

        // ==================== Receiving ====================
        trace.enter(TurnPhase::Receiving);
        self.validate(&input.message)?;
        let session_id = match input.session_id {
            Some(id) => id,
            None => self.sessions.create().await?.id().clone(),
        };
        let mut txn = self.sessions.begin(&session_id).await?;
        info!(
            session_id = %session_id,
            message = truncate_chars(&input.message, 100),
            "Customer turn"
        );

        // ==================== Extracting ====================
        trace.enter(TurnPhase::Extracting);
        let extracted = self.extractor.extract(
            &input.message,
            txn.session().preferences(),
            txn.session().itinerary(),
        );
        info!(
            session_id = %session_id,
            intent = extracted.intent.as_str(),
            updates = ?extracted.updates.field_names(),
            ids = extracted.item_ids.len(),
            "Extracted intent"
        );

        // ==================== Retrieving ====================
        let mut effective = txn.session().preferences().clone();
        effective.apply(&extracted.updates);
        let retrieval = if extracted.is_informational() {
            trace.enter(TurnPhase::Retrieving);
            Some(self.retrieve(&extracted, &effective).await)
        } else {
            None
        };

        // ==================== Mutating ====================
        trace.enter(TurnPhase::Mutating);
        txn.append_message(Role::User, &input.message);
        let applied = txn.session_mut().apply_preferences(&extracted.updates);
        if !applied && !extracted.updates.is_empty() {
            info!(session_id = %session_id, "Preference update ignored on confirmed itinerary");
        }
        let mutation = self.mutate(txn.session_mut(), &extracted).await?;

        // ==================== Composing ====================
        trace.enter(TurnPhase::Composing);
        let ack_fields = if applied {
            extracted.updates.field_names()
        } else {
            Vec::new()
        };
        let reply_text = self.compose(
            txn.session(),
            &extracted,
            &ack_fields,
            retrieval.as_ref(),
            &mutation,
        );
        txn.append_message(Role::Assistant, &reply_text);

        // ==================== Persisted ====================
        // Booking, then outbox entry, then session. A later failure rolls
        // back the earlier writes.
        let queued = match mutation {
            Mutation::Confirmed(ref booking) => Some(self.store_booking(booking).await?),
            _ => None,
        };
        let session = match txn.commit().await {
            Ok(session) => session,
            Err(e) => {
                if let (Mutation::Confirmed(booking), Some(notification)) = (&mutation, &queued) {
                    self.roll_back_booking(booking, Some(notification)).await;
                }
                return Err(e);
            }
        };
        trace.enter(TurnPhase::Persisted);

        if let (Mutation::Confirmed(booking), Some(notification)) = (&mutation, queued) {
            self.after_confirmation(booking, notification, &session).await;
        }

        let view = self.engine().view(&session);
        let retrieval_label = retrieval.as_ref().map(|(outcome, _)| outcome.label());
        let rejected = match &mutation {
            Mutation::Rejected(e) => Some(e.to_string()),
            _ => None,
        };
        let latency_ms = started.elapsed().as_millis() as u64;
        self.evaluation_logger.log(EvaluationEvent::new(
            "turn_completed",
            json!({
                "session_id": session.id().as_str(),
                "intent": extracted.intent.as_str(),
                "retrieval": retrieval_label,
                "updated_fields": extracted.updates.field_names(),
                "latency_ms": latency_ms,
                "rejected": rejected,
            }),
        ));

        Ok(ChatReply {
            session_id: session.id().clone(),
            reply_text,
            intent: extracted.intent,
            preferences: session.preferences().clone(),
            itinerary_summary_text: view.summary_text(session.preferences().destination.as_deref()),
            confirmed: session.is_confirmed(),
            booking_id: session.booking_id().cloned(),
            retrieval: retrieval_label,
            trace,
        })
    }

    /// Query shaped as `"{destination} travel {topic}"` when a destination is known.
    fn retrieval_query(extracted: &ExtractedIntent, prefs: &Preferences) -> String {
        let topic = extracted
            .information_need
            .as_deref()
            .or_else(|| match extracted.intent {
                Intent::SearchFlights => Some("flights"),
                Intent::SearchHotels => Some("hotels"),
                Intent::SearchActivities => Some("activities"),
                _ => None,
            })
            .unwrap_or("");
        match prefs.destination.as_deref() {
            Some(dest) => format!("{} travel {}", dest, topic).trim().to_string(),
            None => extracted.raw_text.trim().to_string(),
        }
    }

    async fn retrieve(
        &self,
        extracted: &ExtractedIntent,
        prefs: &Preferences,
    ) -> (RetrievalOutcome, Option<TravelGuide>) {
        let query = Self::retrieval_query(extracted, prefs);
        let outcome = self.router.retrieve(&query).await;

        // A guide hit on an informational question is rendered in full.
        let guide_city = match (&outcome, extracted.intent) {
            (RetrievalOutcome::Internal(docs), Intent::Smalltalk) => docs
                .iter()
                .find(|d| d.document.kind == DocumentKind::Guide)
                .and_then(|d| d.document.city.clone()),
            _ => None,
        };
        let guide = match guide_city {
            Some(city) => {
                let lookup = self.knowledge.guide_for(&city);
                match tokio::time::timeout(self.params.retrieval.source_timeout, lookup).await {
                    Ok(Ok(guide)) => guide,
                    Ok(Err(e)) => {
                        warn!(city = %city, error = %e, "Guide lookup failed");
                        None
                    }
                    Err(_) => {
                        warn!(city = %city, "Guide lookup timed out");
                        None
                    }
                }
            }
            None => None,
        };
        (outcome, guide)
    }

    async fn mutate(
        &self,
        session: &mut Session,
        extracted: &ExtractedIntent,
    ) -> Result<Mutation, ConciergeError> {
        let engine = self.engine();
        let mutation = match extracted.intent {
            Intent::AddItem => Mutation::Added(
                extracted
                    .item_ids
                    .iter()
                    .map(|id| (id.clone(), engine.add(session, id.kind(), id)))
                    .collect(),
            ),
            Intent::ConfirmBooking => {
                let booking_id = self.new_booking_id().await?;
                match engine.confirm(session, booking_id, Utc::now()) {
                    Ok(booking) => Mutation::Confirmed(booking),
                    Err(e) => {
                        info!(session_id = %session.id(), error = %e, "Confirmation rejected");
                        Mutation::Rejected(e)
                    }
                }
            }
            _ => Mutation::None,
        };
        Ok(mutation)
    }

    /// Random `TRV-XXXXXX` reference not used by any stored booking.
    async fn new_booking_id(&self) -> Result<BookingId, ConciergeError> {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        loop {
            let suffix: String = {
                let mut rng = rand::thread_rng();
                (0..BookingId::SUFFIX_LEN)
                    .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
                    .collect()
            };
            let id = BookingId::from_suffix(&suffix)?;
            if self.bookings.load(&id).await?.is_none() {
                return Ok(id);
            }
        }
    }

    fn compose(
        &self,
        session: &Session,
        extracted: &ExtractedIntent,
        ack_fields: &[&str],
        retrieval: Option<&(RetrievalOutcome, Option<TravelGuide>)>,
        mutation: &Mutation,
    ) -> String {
        let prefs = session.preferences();
        let ack = compose::preferences_ack(prefs, ack_fields);
        let mut sections: Vec<String> = Vec::new();

        match (extracted.intent, mutation) {
            (_, Mutation::Added(results)) => {
                sections.push(compose::add_results(&self.catalog, results));
                sections.push(
                    self.engine()
                        .view(session)
                        .summary_text(prefs.destination.as_deref()),
                );
            }
            (_, Mutation::Confirmed(booking)) => sections.push(compose::confirmation(booking)),
            (_, Mutation::Rejected(e)) => sections.push(compose::describe_error(e)),
            (intent, Mutation::None) => {
                if !ack.is_empty() {
                    sections.push(ack);
                }
                if let Some(kind) = intent.search_kind() {
                    sections.push(compose::search_listing(&self.catalog, kind, prefs));
                }
                match intent {
                    Intent::AdminQuery => sections.push(compose::admin_forwarded()),
                    Intent::RefinePreferences | Intent::Smalltalk if retrieval.is_none() => {
                        sections.push(match prefs.destination.as_deref() {
                            Some(dest) => compose::options(dest),
                            None => compose::welcome(),
                        });
                    }
                    _ => {}
                }
                if let Some((outcome, guide)) = retrieval {
                    sections.push(compose::retrieval_context(outcome, guide.as_ref()));
                }
            }
        }
        sections.retain(|s| !s.trim().is_empty());
        sections.join("\n\n")
    }

    /// Save the booking and queue its notification.
    ///
    /// Either both are stored or neither is.
    async fn store_booking(&self, booking: &Booking) -> Result<Notification, ConciergeError> {
        self.bookings.save(booking).await?;
        match self.notifications.enqueue(booking).await {
            Ok(notification) => Ok(notification),
            Err(e) => {
                error!(booking_id = %booking.id, error = %e, "Failed to queue notification");
                self.roll_back_booking(booking, None).await;
                Err(e)
            }
        }
    }

    async fn roll_back_booking(&self, booking: &Booking, notification: Option<&Notification>) {
        warn!(booking_id = %booking.id, "Rolling back unconfirmed booking");
        if let Some(notification) = notification
            && let Err(e) = self.notifications.discard(&notification.id).await
        {
            error!(notification_id = %notification.id, error = %e, "Failed to discard notification");
        }
        if let Err(e) = self.bookings.delete(&booking.id).await {
            error!(booking_id = %booking.id, error = %e, "Failed to delete booking");
        }
    }

    /// Deliver the queued notification and record the confirmation.
    ///
    /// Delivery failures leave the notification pending in the outbox.
    async fn after_confirmation(
        &self,
        booking: &Booking,
        notification: Notification,
        session: &Session,
    ) {
        let delivered = match self.notifications.deliver_queued(notification).await {
            Ok(notification) => !notification.is_pending(),
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "Failed to record delivery");
                false
            }
        };
        info!(
            session_id = %session.id(),
            booking_id = %booking.id,
            total_cost = booking.total_cost(),
            "Booking confirmed"
        );
        let user_turns = session
            .history()
            .iter()
            .filter(|e| e.role == Role::User)
            .count();
        let items = booking.itinerary.flights.len()
            + booking.itinerary.hotels.len()
            + booking.itinerary.activities.len();
        self.evaluation_logger.log(EvaluationEvent::new(
            "booking_confirmed",
            json!({
                "session_id": session.id().as_str(),
                "booking_id": booking.id.as_str(),
                "total_cost": booking.total_cost(),
                "items": items,
                "turns_to_confirm": user_turns,
                "notification_delivered": delivered,
            }),
        ));
    }
}
