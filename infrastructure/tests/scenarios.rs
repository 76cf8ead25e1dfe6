//! End-to-end conversations through `ConciergeService` with the in-memory
//! adapters.

use async_trait::async_trait;
use concierge_application::{
    AdminTarget, ConciergeError, ConciergeService, ExternalFetcher, FetchError,
    NotificationChannel, NotificationError, NotificationOutbox,
};
use concierge_domain::{
    BookingStatus, DomainError, Intent, Notification, RepositoryError, SessionId, WebSnippet,
};
use concierge_infrastructure::{
    CatalogData, InMemoryBookingRepository, InMemoryKnowledgeStore, InMemoryOutbox,
    InMemorySessionRepository,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

// ==================== Test doubles ====================

#[derive(Default)]
struct CountingFetcher {
    calls: AtomicU32,
}

#[async_trait]
impl ExternalFetcher for CountingFetcher {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn fetch(&self, query: &str, _max: usize) -> Result<Vec<WebSnippet>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![WebSnippet {
            title: format!("About {}", query),
            url: "https://example.com/result".to_string(),
            snippet: "Mild and sunny most of the year.".to_string(),
        }])
    }
}

#[derive(Default)]
struct CountingChannel {
    delivered: AtomicU32,
}

#[async_trait]
impl NotificationChannel for CountingChannel {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn deliver(&self, _n: &Notification) -> Result<(), NotificationError> {
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory outbox whose next `enqueue` fails when armed.
#[derive(Default)]
struct FlakyOutbox {
    inner: InMemoryOutbox,
    fail_next_enqueue: AtomicBool,
}

#[async_trait]
impl NotificationOutbox for FlakyOutbox {
    async fn enqueue(&self, n: &Notification) -> Result<(), RepositoryError> {
        if self.fail_next_enqueue.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::Io("outbox write failed".to_string()));
        }
        self.inner.enqueue(n).await
    }

    async fn update(&self, n: &Notification) -> Result<(), RepositoryError> {
        self.inner.update(n).await
    }

    async fn get(&self, id: &str) -> Result<Option<Notification>, RepositoryError> {
        self.inner.get(id).await
    }

    async fn remove(&self, id: &str) -> Result<(), RepositoryError> {
        self.inner.remove(id).await
    }

    async fn list(&self) -> Result<Vec<Notification>, RepositoryError> {
        self.inner.list().await
    }
}

/// Inventory with round prices: HT001 at 100/night, AC001 at 50.
const SMALL_CATALOG: &str = r#"{
  "flights": [],
  "hotels": [
    {"id": "HT001", "name": "Albergo Roma", "city": "Rome", "rating": 4.0,
     "price_per_night": 100.0, "amenities": ["WiFi"], "description": "Near Termini."}
  ],
  "activities": [
    {"id": "AC001", "name": "Colosseum Tour", "city": "Rome", "duration": "2 hours",
     "price": 50.0, "description": "Arena and forum."}
  ],
  "guides": []
}"#;

struct Harness {
    service: ConciergeService,
    fetcher: Arc<CountingFetcher>,
    channel: Arc<CountingChannel>,
}

fn harness_with(data: CatalogData, index_catalog: bool) -> Harness {
    harness_with_outbox(data, index_catalog, Arc::new(InMemoryOutbox::new()))
}

fn harness_with_outbox(
    data: CatalogData,
    index_catalog: bool,
    outbox: Arc<dyn NotificationOutbox>,
) -> Harness {
    let (catalog, guides) = data.into_parts();
    let knowledge = if index_catalog {
        InMemoryKnowledgeStore::from_catalog(&catalog, guides)
    } else {
        InMemoryKnowledgeStore::new()
    };
    let fetcher = Arc::new(CountingFetcher::default());
    let channel = Arc::new(CountingChannel::default());
    let service = ConciergeService::new(
        Arc::new(catalog),
        Arc::new(knowledge),
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(InMemoryBookingRepository::new()),
        outbox,
    )
    .with_fetcher(fetcher.clone())
    .with_notification_channel(channel.clone());
    Harness {
        service,
        fetcher,
        channel,
    }
}

fn builtin() -> Harness {
    harness_with(CatalogData::builtin().unwrap(), true)
}

async fn confirmed_rome_trip(h: &Harness) -> SessionId {
    let first = h
        .service
        .chat("I want to visit Rome from 2025-05-01 to 2025-05-04", None)
        .await
        .unwrap();
    let id = first.session_id;
    h.service.add_item(&id, "hotel", "HT001").await.unwrap();
    h.service.add_item(&id, "activity", "ac001").await.unwrap();
    h.service
        .set_customer_info(&id, "ana@example.com", Some("Ana"), None)
        .await
        .unwrap();
    let reply = h.service.chat("confirm booking", Some(&id)).await.unwrap();
    assert!(reply.confirmed, "{}", reply.reply_text);
    id
}

// ==================== Scenarios ====================

#[tokio::test]
async fn test_first_message_records_destination_and_budget() {
    let h = builtin();
    let reply = h
        .service
        .chat("I want to plan a trip to Paris with a budget of 2000", None)
        .await
        .unwrap();

    assert_eq!(reply.preferences.destination.as_deref(), Some("Paris"));
    assert_eq!(reply.preferences.budget, Some(2000.0));
    assert!(matches!(
        reply.intent,
        Intent::RefinePreferences | Intent::SearchFlights
    ));
}

#[tokio::test]
async fn test_add_item_normalizes_and_rejects_duplicates() {
    let h = builtin();
    let id = h.service.create_session().await.unwrap().id().clone();

    let view = h.service.add_item(&id, "flight", "fl001").await.unwrap();
    assert_eq!(view.flights.len(), 1);
    assert_eq!(view.flights[0].id.as_str(), "FL001");
    assert_eq!(view.total_cost, 650.0);

    let err = h.service.add_item(&id, "flight", "FL001").await.unwrap_err();
    assert!(matches!(
        err,
        ConciergeError::Domain(DomainError::Duplicate { .. })
    ));
    assert_eq!(h.service.get_itinerary(&id).await.unwrap().total_cost, 650.0);
}

#[tokio::test]
async fn test_total_cost_independent_of_add_order() {
    let h = builtin();
    let a = h.service.create_session().await.unwrap().id().clone();
    let b = h.service.create_session().await.unwrap().id().clone();

    for (kind, item) in [("flight", "FL001"), ("hotel", "HT001"), ("activity", "AC001")] {
        h.service.add_item(&a, kind, item).await.unwrap();
    }
    for (kind, item) in [("activity", "AC001"), ("hotel", "HT001"), ("flight", "FL001")] {
        h.service.add_item(&b, kind, item).await.unwrap();
    }

    let cost_a = h.service.get_itinerary(&a).await.unwrap().total_cost;
    let cost_b = h.service.get_itinerary(&b).await.unwrap().total_cost;
    assert_eq!(cost_a, 650.0 + 180.0 + 65.0);
    assert_eq!(cost_a, cost_b);
}

#[tokio::test]
async fn test_unknown_or_mismatched_items_are_not_found() {
    let h = builtin();
    let id = h.service.create_session().await.unwrap().id().clone();

    assert!(
        h.service
            .add_item(&id, "flight", "FL999")
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        h.service
            .add_item(&id, "hotel", "FL001")
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        h.service
            .get_itinerary(&SessionId::new("missing"))
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_confirm_preconditions_are_conversational() {
    let h = builtin();
    let first = h.service.chat("hello", None).await.unwrap();
    let id = first.session_id;

    let empty = h.service.chat("confirm booking", Some(&id)).await.unwrap();
    assert!(!empty.confirmed);
    assert!(empty.reply_text.contains("itinerary is empty"));

    h.service.add_item(&id, "hotel", "HT002").await.unwrap();
    let no_email = h.service.chat("confirm booking", Some(&id)).await.unwrap();
    assert!(!no_email.confirmed);
    assert!(no_email.reply_text.contains("email address"));

    assert!(h.service.list_bookings().await.unwrap().is_empty());
    assert_eq!(h.channel.delivered.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_confirm_books_350_and_notifies_once() {
    let h = harness_with(CatalogData::from_json(SMALL_CATALOG).unwrap(), true);
    let id = confirmed_rome_trip(&h).await;

    let bookings = h.service.list_bookings().await.unwrap();
    assert_eq!(bookings.len(), 1);
    let booking = &bookings[0];
    assert_eq!(booking.total_cost(), 350.0);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.itinerary.nights, 3);
    assert!(booking.chat_summary.starts_with("Customer had"));

    let details = h.service.get_session_details(&id).await.unwrap();
    assert!(details.session.is_confirmed());
    assert_eq!(details.booking.as_ref().map(|b| &b.id), Some(&booking.id));

    assert_eq!(h.channel.delivered.load(Ordering::SeqCst), 1);
    let feed = h.service.list_notifications().await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].booking_id, booking.id);
    assert!(!feed[0].is_pending());

    // Later turns keep reporting the booking; a second confirm changes nothing.
    let again = h.service.chat("confirm", Some(&id)).await.unwrap();
    assert_eq!(again.booking_id.as_ref(), Some(&booking.id));
    assert_eq!(h.service.list_bookings().await.unwrap().len(), 1);
    assert_eq!(h.channel.delivered.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_confirmed_itinerary_is_frozen() {
    let h = harness_with(CatalogData::from_json(SMALL_CATALOG).unwrap(), true);
    let id = confirmed_rome_trip(&h).await;
    let before = h.service.get_itinerary(&id).await.unwrap();

    let add = h.service.add_item(&id, "hotel", "HT001").await.unwrap_err();
    assert!(matches!(add, ConciergeError::Domain(DomainError::AlreadyConfirmed)));
    let remove = h.service.remove_item(&id, "activity", "AC001").await.unwrap_err();
    assert!(matches!(
        remove,
        ConciergeError::Domain(DomainError::AlreadyConfirmed)
    ));

    assert_eq!(h.service.get_itinerary(&id).await.unwrap(), before);
}

#[tokio::test]
async fn test_booking_status_lifecycle() {
    let h = harness_with(CatalogData::from_json(SMALL_CATALOG).unwrap(), true);
    confirmed_rome_trip(&h).await;
    let booking_id = h.service.list_bookings().await.unwrap()[0].id.to_string();

    let completed = h
        .service
        .update_booking_status(&booking_id, "completed")
        .await
        .unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);

    let cancelled = h
        .service
        .update_booking_status(&booking_id, "cancelled")
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    let repeated = h
        .service
        .update_booking_status(&booking_id, "cancelled")
        .await
        .unwrap();
    assert_eq!(repeated.status, BookingStatus::Cancelled);
    assert_eq!(repeated.updated_at, cancelled.updated_at);

    let reopen = h
        .service
        .update_booking_status(&booking_id, "completed")
        .await
        .unwrap_err();
    assert!(matches!(
        reopen,
        ConciergeError::Domain(DomainError::InvalidStatus(_))
    ));
    assert!(
        h.service
            .update_booking_status("TRV-ZZZZZZ", "cancelled")
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_knowledge_store_hit_skips_fetcher() {
    let h = builtin();
    let reply = h
        .service
        .chat("What is the best time to visit Paris?", None)
        .await
        .unwrap();

    assert_eq!(reply.retrieval, Some("knowledge_store"));
    assert!(reply.reply_text.contains("**Travel Guide: Paris**"));
    assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_knowledge_store_miss_falls_back_to_web() {
    let h = harness_with(CatalogData::from_json(SMALL_CATALOG).unwrap(), false);
    let reply = h
        .service
        .chat("What is the weather like there?", None)
        .await
        .unwrap();

    assert_eq!(reply.retrieval, Some("web"));
    assert!(reply.reply_text.contains("**From the web:**"));
    assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_message_count_tracks_turns() {
    let h = builtin();
    let empty = h.service.create_session().await.unwrap().id().clone();
    let first = h.service.chat("hello", None).await.unwrap();
    let id = first.session_id;
    for message in ["show me hotels in Paris", "add HT001", "thanks"] {
        h.service.chat(message, Some(&id)).await.unwrap();
    }

    let sessions = h.service.list_sessions().await.unwrap();
    let count = |sid: &SessionId| {
        sessions
            .iter()
            .find(|s| &s.id == sid)
            .map(|s| s.message_count)
    };
    assert_eq!(count(&id), Some(8));
    assert_eq!(count(&empty), Some(0));
}

#[tokio::test]
async fn test_admin_reads_booking_conversation() {
    let h = harness_with(CatalogData::from_json(SMALL_CATALOG).unwrap(), true);
    let session_id = confirmed_rome_trip(&h).await;
    let booking_id = h.service.list_bookings().await.unwrap()[0].id.clone();

    let details = h.service.get_booking(booking_id.as_str()).await.unwrap();
    assert_eq!(details.booking.session_id, session_id);
    assert!(!details.chat_history.is_empty());

    let answer = h
        .service
        .admin_query("Which dates did they ask about?", AdminTarget::Booking(booking_id))
        .await
        .unwrap();
    assert_eq!(answer.session_id, Some(session_id));
    assert!(!answer.answer_text.is_empty());

    assert!(
        h.service
            .admin_query("anything", AdminTarget::Session(SessionId::new("missing")))
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_admin_queries_are_read_only() {
    let h = harness_with(CatalogData::from_json(SMALL_CATALOG).unwrap(), true);
    let session_id = confirmed_rome_trip(&h).await;
    let booking_id = h.service.list_bookings().await.unwrap()[0].id.clone();
    let session_before = h.service.get_session_details(&session_id).await.unwrap();
    let booking_before = h.service.get_booking(booking_id.as_str()).await.unwrap().booking;

    for target in [
        AdminTarget::Session(session_id.clone()),
        AdminTarget::Booking(booking_id.clone()),
        AdminTarget::All,
    ] {
        h.service
            .admin_query("What hotel did they book in Rome?", target)
            .await
            .unwrap();
    }

    let session_after = h.service.get_session_details(&session_id).await.unwrap();
    assert_eq!(
        session_after.session.message_count(),
        session_before.session.message_count()
    );
    assert_eq!(session_after.session, session_before.session);
    assert_eq!(session_after.itinerary, session_before.itinerary);
    let booking_after = h.service.get_booking(booking_id.as_str()).await.unwrap().booking;
    assert_eq!(booking_after.status, BookingStatus::Confirmed);
    assert_eq!(booking_after.updated_at, booking_before.updated_at);
    assert_eq!(booking_after, booking_before);
    assert_eq!(h.channel.delivered.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_new_dates_after_confirmation_keep_the_booked_total() {
    let h = harness_with(CatalogData::from_json(SMALL_CATALOG).unwrap(), true);
    let id = confirmed_rome_trip(&h).await;
    assert_eq!(h.service.get_itinerary(&id).await.unwrap().total_cost, 350.0);

    let reply = h
        .service
        .chat("Actually make it 2025-05-01 to 2025-05-11", Some(&id))
        .await
        .unwrap();
    assert!(reply.confirmed);

    let itinerary = h.service.get_itinerary(&id).await.unwrap();
    let booking = &h.service.list_bookings().await.unwrap()[0];
    assert_eq!(itinerary.total_cost, 350.0);
    assert_eq!(itinerary.total_cost, booking.total_cost());
}

#[tokio::test]
async fn test_outbox_failure_never_strands_a_booking() {
    let outbox = Arc::new(FlakyOutbox::default());
    let h = harness_with_outbox(
        CatalogData::from_json(SMALL_CATALOG).unwrap(),
        true,
        outbox.clone(),
    );
    let first = h
        .service
        .chat("I want to visit Rome from 2025-05-01 to 2025-05-04", None)
        .await
        .unwrap();
    let id = first.session_id;
    h.service.add_item(&id, "hotel", "HT001").await.unwrap();
    h.service.add_item(&id, "activity", "AC001").await.unwrap();
    h.service
        .set_customer_info(&id, "ana@example.com", None, None)
        .await
        .unwrap();

    outbox.fail_next_enqueue.store(true, Ordering::SeqCst);
    let err = h.service.chat("confirm booking", Some(&id)).await.unwrap_err();
    assert!(err.is_fatal());
    assert!(h.service.list_bookings().await.unwrap().is_empty());
    assert!(!h.service.get_itinerary(&id).await.unwrap().confirmed);

    let reply = h.service.chat("confirm booking", Some(&id)).await.unwrap();
    assert!(reply.confirmed);
    assert_eq!(h.service.list_bookings().await.unwrap().len(), 1);
    let notifications = h.service.list_notifications().await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].booking_id, reply.booking_id.unwrap());
    assert_eq!(h.channel.delivered.load(Ordering::SeqCst), 1);
}
