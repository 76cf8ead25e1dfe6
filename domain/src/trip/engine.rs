//! Itinerary engine: validated mutations, cost and confirmation.

use super::view::ItineraryView;
use crate::booking::entities::{Booking, BookingId, BookingStatus};
use crate::catalog::inventory::Catalog;
use crate::catalog::item_id::{ItemId, ItemKind, kind_entity};
use crate::core::error::DomainError;
use crate::session::entities::Session;
use chrono::{DateTime, Utc};

/// Nights charged per hotel when the trip dates are unknown.
pub const DEFAULT_NIGHTS: u32 = 1;

/// Applies itinerary rules to a session against a catalog.
///
/// Stateless apart from its borrowed catalog; totals are recomputed from
/// the catalog on every call, so price corrections show up immediately.
#[derive(Debug, Clone, Copy)]
pub struct ItineraryEngine<'a> {
    catalog: &'a Catalog,
    default_nights: u32,
}

impl<'a> ItineraryEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            default_nights: DEFAULT_NIGHTS,
        }
    }

    /// Override the fallback stay length. Zero is treated as one night.
    pub fn with_default_nights(mut self, nights: u32) -> Self {
        self.default_nights = nights.max(1);
        self
    }

    /// Stay length for the session's dates, else the default.
    pub fn nights(&self, session: &Session) -> u32 {
        session
            .preferences()
            .nights()
            .unwrap_or(self.default_nights)
    }

    /// Add a catalog item to the session's itinerary.
    pub fn add(&self, session: &mut Session, kind: ItemKind, id: &ItemId) -> Result<(), DomainError> {
        if session.is_confirmed() {
            return Err(DomainError::AlreadyConfirmed);
        }
        if id.kind() != kind || !self.catalog.contains(kind, id) {
            return Err(DomainError::not_found(kind_entity(kind), id.as_str()));
        }
        if !session.itinerary_mut().push(kind, id.clone()) {
            return Err(DomainError::Duplicate {
                kind,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Remove an item. Returns `false` if it was not selected.
    pub fn remove(
        &self,
        session: &mut Session,
        kind: ItemKind,
        id: &ItemId,
    ) -> Result<bool, DomainError> {
        if session.is_confirmed() {
            return Err(DomainError::AlreadyConfirmed);
        }
        Ok(session.itinerary_mut().remove(kind, id))
    }

    /// Flights + hotel nightly rate × nights + activities.
    pub fn total_cost(&self, session: &Session) -> f64 {
        self.view(session).total_cost
    }

    /// Resolve every selection against the catalog.
    ///
    /// Selections whose id no longer resolves are left out of the view and
    /// of the total.
    pub fn view(&self, session: &Session) -> ItineraryView {
        let itinerary = session.itinerary();
        let nights = self.nights(session);

        let flights: Vec<_> = itinerary
            .ids(ItemKind::Flight)
            .iter()
            .filter_map(|id| self.catalog.flight(id).cloned())
            .collect();
        let hotels: Vec<_> = itinerary
            .ids(ItemKind::Hotel)
            .iter()
            .filter_map(|id| self.catalog.hotel(id).cloned())
            .collect();
        let activities: Vec<_> = itinerary
            .ids(ItemKind::Activity)
            .iter()
            .filter_map(|id| self.catalog.activity(id).cloned())
            .collect();

        let total_cost = flights.iter().map(|f| f.price).sum::<f64>()
            + hotels
                .iter()
                .map(|h| h.price_per_night * f64::from(nights))
                .sum::<f64>()
            + activities.iter().map(|a| a.price).sum::<f64>();

        ItineraryView {
            flights,
            hotels,
            activities,
            nights,
            total_cost,
            confirmed: itinerary.is_confirmed(),
        }
    }

    /// Confirm the itinerary and take the booking snapshot.
    ///
    /// Checks run in order: already confirmed, empty itinerary, missing
    /// customer email. On success the itinerary is frozen and the session
    /// records the booking id.
    pub fn confirm(
        &self,
        session: &mut Session,
        booking_id: BookingId,
        at: DateTime<Utc>,
    ) -> Result<Booking, DomainError> {
        if session.is_confirmed() {
            return Err(DomainError::AlreadyConfirmed);
        }
        if session.itinerary().is_empty() {
            return Err(DomainError::EmptyItinerary);
        }
        let customer = session
            .customer()
            .filter(|c| !c.email.trim().is_empty())
            .cloned()
            .ok_or(DomainError::MissingCustomerInfo)?;

        session.itinerary_mut().mark_confirmed();
        session.record_booking(booking_id.clone());

        Ok(Booking {
            id: booking_id,
            session_id: session.id().clone(),
            customer,
            preferences: session.preferences().clone(),
            itinerary: self.view(session),
            chat_summary: session.chat_summary(),
            status: BookingStatus::Confirmed,
            created_at: at,
            updated_at: at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::inventory::fixtures::sample_catalog;
    use crate::session::entities::{CustomerInfo, Role, SessionId};
    use crate::trip::preferences::PreferenceUpdate;
    use chrono::NaiveDate;

    fn id(raw: &str) -> ItemId {
        ItemId::parse(raw).unwrap()
    }

    fn session() -> Session {
        Session::new(SessionId::new("s1"), Utc::now())
    }

    fn booking_id() -> BookingId {
        BookingId::parse("TRV-TEST01").unwrap()
    }

    fn three_nights() -> PreferenceUpdate {
        PreferenceUpdate {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 15),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 18),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_and_total() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let mut s = session();

        engine.add(&mut s, ItemKind::Flight, &id("fl001")).unwrap();
        assert_eq!(s.itinerary().ids(ItemKind::Flight), &[id("FL001")]);
        assert_eq!(engine.total_cost(&s), 650.0);

        engine.add(&mut s, ItemKind::Hotel, &id("HT001")).unwrap();
        assert_eq!(engine.total_cost(&s), 750.0);
    }

    #[test]
    fn test_total_is_order_independent() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let items = [
            (ItemKind::Flight, "FL003"),
            (ItemKind::Hotel, "HT002"),
            (ItemKind::Activity, "AC001"),
            (ItemKind::Hotel, "HT001"),
        ];

        let mut forward = session();
        forward.apply_preferences(&three_nights());
        for (kind, raw) in items {
            engine.add(&mut forward, kind, &id(raw)).unwrap();
        }
        let mut backward = session();
        backward.apply_preferences(&three_nights());
        for (kind, raw) in items.iter().rev() {
            engine.add(&mut backward, *kind, &id(raw)).unwrap();
        }

        let expected = 520.0 + (320.0 + 100.0) * 3.0 + 50.0;
        assert_eq!(engine.total_cost(&forward), expected);
        assert_eq!(engine.total_cost(&backward), expected);
    }

    #[test]
    fn test_add_unknown_or_wrong_kind_is_not_found() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let mut s = session();

        let err = engine.add(&mut s, ItemKind::Flight, &id("FL999")).unwrap_err();
        assert!(err.is_not_found());
        let err = engine.add(&mut s, ItemKind::Hotel, &id("FL001")).unwrap_err();
        assert!(err.is_not_found());
        assert!(s.itinerary().is_empty());
    }

    #[test]
    fn test_duplicate_never_double_counts() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let mut s = session();

        engine.add(&mut s, ItemKind::Flight, &id("FL001")).unwrap();
        let err = engine.add(&mut s, ItemKind::Flight, &id("FL001")).unwrap_err();
        assert!(matches!(err, DomainError::Duplicate { kind: ItemKind::Flight, .. }));
        assert_eq!(engine.total_cost(&s), 650.0);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let mut s = session();

        assert!(!engine.remove(&mut s, ItemKind::Hotel, &id("HT001")).unwrap());
        engine.add(&mut s, ItemKind::Hotel, &id("HT001")).unwrap();
        assert!(engine.remove(&mut s, ItemKind::Hotel, &id("HT001")).unwrap());
        assert_eq!(engine.total_cost(&s), 0.0);
    }

    #[test]
    fn test_default_nights() {
        let catalog = sample_catalog();
        let mut s = session();
        let engine = ItineraryEngine::new(&catalog);
        engine.add(&mut s, ItemKind::Hotel, &id("HT001")).unwrap();
        assert_eq!(engine.total_cost(&s), 100.0);

        let engine = ItineraryEngine::new(&catalog).with_default_nights(2);
        assert_eq!(engine.total_cost(&s), 200.0);

        s.apply_preferences(&three_nights());
        assert_eq!(engine.total_cost(&s), 300.0);
    }

    #[test]
    fn test_confirm_preconditions() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let mut s = session();

        assert_eq!(
            engine.confirm(&mut s, booking_id(), Utc::now()).unwrap_err(),
            DomainError::EmptyItinerary
        );

        engine.add(&mut s, ItemKind::Activity, &id("AC001")).unwrap();
        assert_eq!(
            engine.confirm(&mut s, booking_id(), Utc::now()).unwrap_err(),
            DomainError::MissingCustomerInfo
        );
        assert!(!s.is_confirmed());
    }

    #[test]
    fn test_confirm_snapshot_and_freeze() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let mut s = session();
        s.apply_preferences(&three_nights());
        s.append_message(Role::User, "book HT001 and AC001", Utc::now());
        s.set_customer(CustomerInfo::new("ana@example.com", None, None).unwrap());
        engine.add(&mut s, ItemKind::Hotel, &id("HT001")).unwrap();
        engine.add(&mut s, ItemKind::Activity, &id("AC001")).unwrap();

        let booking = engine.confirm(&mut s, booking_id(), Utc::now()).unwrap();
        assert_eq!(booking.total_cost(), 350.0);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.session_id, *s.id());
        assert!(booking.itinerary.confirmed);
        assert!(s.is_confirmed());
        assert_eq!(s.booking_id(), Some(&booking_id()));

        let before = s.itinerary().clone();
        assert_eq!(
            engine.add(&mut s, ItemKind::Flight, &id("FL001")).unwrap_err(),
            DomainError::AlreadyConfirmed
        );
        assert_eq!(
            engine.remove(&mut s, ItemKind::Hotel, &id("HT001")).unwrap_err(),
            DomainError::AlreadyConfirmed
        );
        assert_eq!(
            engine.confirm(&mut s, booking_id(), Utc::now()).unwrap_err(),
            DomainError::AlreadyConfirmed
        );
        assert_eq!(s.itinerary(), &before);
    }

    #[test]
    fn test_confirmed_total_ignores_new_dates() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let mut s = session();
        s.apply_preferences(&three_nights());
        s.set_customer(CustomerInfo::new("ana@example.com", None, None).unwrap());
        engine.add(&mut s, ItemKind::Hotel, &id("HT001")).unwrap();
        engine.add(&mut s, ItemKind::Activity, &id("AC001")).unwrap();
        let booking = engine.confirm(&mut s, booking_id(), Utc::now()).unwrap();

        let ten_nights = PreferenceUpdate {
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 11),
            ..Default::default()
        };
        assert!(!s.apply_preferences(&ten_nights));
        assert_eq!(engine.nights(&s), 3);
        assert_eq!(engine.total_cost(&s), booking.total_cost());
    }

    #[test]
    fn test_booking_snapshot_is_detached_from_session() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let mut s = session();
        s.set_customer(CustomerInfo::new("ana@example.com", None, None).unwrap());
        engine.add(&mut s, ItemKind::Activity, &id("AC001")).unwrap();
        let booking = engine.confirm(&mut s, booking_id(), Utc::now()).unwrap();

        s.append_message(Role::User, "thanks!", Utc::now());
        assert_eq!(booking.chat_summary, "Customer had 0 messages; destination not specified");
    }

    #[test]
    fn test_summary_text() {
        let catalog = sample_catalog();
        let engine = ItineraryEngine::new(&catalog);
        let mut s = session();
        assert!(engine.view(&s).summary_text(None).contains("empty"));

        engine.add(&mut s, ItemKind::Flight, &id("FL001")).unwrap();
        let text = engine.view(&s).summary_text(Some("Paris"));
        assert!(text.contains("**Destination:** Paris"));
        assert!(text.contains("FL001"));
        assert!(text.contains("**Estimated Total:** $650.00"));
        assert!(text.contains("confirm booking"));
    }
}
