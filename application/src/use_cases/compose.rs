//! Reply composition for customer turns.
//!
//! Pure text building: catalog listings filtered by the session's
//! preferences, retrieval context, and the wording of itinerary outcomes.

use crate::use_cases::retrieval::RetrievalOutcome;
use concierge_domain::util::preview;
use concierge_domain::{
    Booking, Catalog, DomainError, ItemId, ItemKind, Preferences, TravelGuide,
};
use std::fmt::Write;

/// Listed results per search reply.
const MAX_LISTED: usize = 5;
/// Retrieved entries quoted per reply.
const MAX_CONTEXT: usize = 3;

pub(crate) const NOT_FOUND_LINE: &str =
    "I couldn't find any additional information about that right now.";

/// Listing for a search intent, filtered by preferences.
pub(crate) fn search_listing(catalog: &Catalog, kind: ItemKind, prefs: &Preferences) -> String {
    let destination = prefs.destination.as_deref();
    let mut out = String::new();
    match kind {
        ItemKind::Flight => {
            let date = prefs.start_date.map(|d| d.format("%Y-%m-%d").to_string());
            let flights =
                catalog.search_flights(prefs.origin.as_deref(), destination, date.as_deref());
            if flights.is_empty() {
                return "No flights found matching your criteria.".to_string();
            }
            out.push_str("**Available Flights:**\n\n");
            for f in flights.into_iter().take(MAX_LISTED) {
                let _ = writeln!(out, "- **{}** ({})", f.airline, f.id);
                let _ = writeln!(out, "  {} → {}", f.from, f.to);
                let _ = writeln!(out, "  Departure: {} | Arrival: {}", f.departure, f.arrival);
                let _ = write!(out, "  Price: ${:.2} ({})\n\n", f.price, f.class);
            }
        }
        ItemKind::Hotel => {
            let cap = prefs.travel_style.and_then(|s| s.hotel_price_cap());
            let hotels = catalog.search_hotels(destination, cap);
            if hotels.is_empty() {
                return "No hotels found matching your criteria.".to_string();
            }
            out.push_str("**Available Hotels:**\n\n");
            for h in hotels.into_iter().take(MAX_LISTED) {
                let _ = writeln!(out, "- **{}** ({}) - {}", h.name, h.id, h.city);
                let _ = writeln!(out, "  Rating: {}", h.rating);
                let _ = writeln!(out, "  Price: ${:.2}/night", h.price_per_night);
                let _ = writeln!(out, "  Amenities: {}", h.amenities.join(", "));
                let _ = write!(out, "  {}\n\n", h.description);
            }
        }
        ItemKind::Activity => {
            let activities = catalog.search_activities(destination);
            if activities.is_empty() {
                return "No activities found for this destination.".to_string();
            }
            out.push_str("**Available Activities:**\n\n");
            for a in activities.into_iter().take(MAX_LISTED) {
                let _ = writeln!(out, "- **{}** ({})", a.name, a.id);
                let _ = writeln!(out, "  Location: {} | Duration: {}", a.city, a.duration);
                let _ = writeln!(out, "  Price: ${:.2}", a.price);
                let _ = write!(out, "  {}\n\n", a.description);
            }
        }
    }
    out.push_str("Reply with an id (e.g. \"add ");
    out.push_str(match kind {
        ItemKind::Flight => "FL001",
        ItemKind::Hotel => "HT001",
        ItemKind::Activity => "AC001",
    });
    out.push_str("\") to add it to your itinerary.");
    out
}

/// Retrieved context, or the apology line on a miss.
pub(crate) fn retrieval_context(outcome: &RetrievalOutcome, guide: Option<&TravelGuide>) -> String {
    if let Some(guide) = guide {
        return guide.render();
    }
    let mut out = String::new();
    match outcome {
        RetrievalOutcome::Internal(documents) => {
            out.push_str("**From our travel knowledge base:**\n");
            for doc in documents.iter().take(MAX_CONTEXT) {
                let _ = writeln!(
                    out,
                    "- [{}] {}",
                    doc.document.kind.as_str().to_uppercase(),
                    preview(&doc.document.content, 240)
                );
            }
        }
        RetrievalOutcome::External(snippets) => {
            out.push_str("**From the web:**\n");
            for s in snippets.iter().take(MAX_CONTEXT) {
                let _ = writeln!(out, "- [{}]({}): {}", s.title, s.url, preview(&s.snippet, 240));
            }
        }
        RetrievalOutcome::NotFound => out.push_str(NOT_FOUND_LINE),
    }
    out
}

pub(crate) fn welcome() -> String {
    "Welcome to Travel Concierge! I'd love to help you plan your perfect trip.\n\n\
     To get started, tell me:\n\
     - Where would you like to go?\n\
     - When are you planning to travel?\n\
     - What's your approximate budget?\n\
     - What kind of experience are you looking for? (budget, moderate, luxury)\n\n\
     Available destinations I have info for: Paris, London, Tokyo, Rome"
        .to_string()
}

pub(crate) fn options(destination: &str) -> String {
    format!(
        "Great choice! I can help you plan your trip to **{}**.\n\n\
         What would you like to explore?\n\
         - Search for **flights**\n\
         - Find **hotels**\n\
         - Discover **activities** and tours\n\
         - Get **travel tips** and guides\n\n\
         Just let me know what interests you!",
        destination
    )
}

/// Acknowledge updated preference fields.
pub(crate) fn preferences_ack(prefs: &Preferences, fields: &[&str]) -> String {
    let mut parts = Vec::new();
    for field in fields {
        let part = match *field {
            "destination" => prefs.destination.as_ref().map(|v| format!("destination **{}**", v)),
            "origin" => prefs.origin.as_ref().map(|v| format!("departing from **{}**", v)),
            "start_date" => prefs.start_date.map(|v| format!("leaving **{}**", v)),
            "end_date" => prefs.end_date.map(|v| format!("returning **{}**", v)),
            "budget" => prefs.budget.map(|v| format!("budget **${:.0}**", v)),
            "travel_style" => prefs.travel_style.map(|v| format!("**{}** style", v)),
            _ => None,
        };
        parts.extend(part);
    }
    if parts.is_empty() {
        return String::new();
    }
    format!("Got it! I've noted: {}.", parts.join(", "))
}

/// One line per attempted add.
pub(crate) fn add_results(catalog: &Catalog, results: &[(ItemId, Result<(), DomainError>)]) -> String {
    let mut out = String::new();
    for (id, result) in results {
        match result {
            Ok(()) => {
                let name = catalog
                    .resolve(id.kind(), id)
                    .map(|item| item.name())
                    .unwrap_or_else(|| id.to_string());
                let _ = writeln!(out, "✅ Added {} ({}) to your itinerary.", name, id);
            }
            Err(e) => {
                let _ = writeln!(out, "⚠️ {}", describe_error(e));
            }
        }
    }
    out
}

pub(crate) fn confirmation(booking: &Booking) -> String {
    format!(
        "🎉 Your trip is booked! Booking reference: **{}**.\n\n\
         Total: **${:.2}**. Our admin team has been notified and will follow up at {}.",
        booking.id,
        booking.total_cost(),
        booking.customer.email
    )
}

/// Conversational wording for a rejected mutation.
pub(crate) fn describe_error(error: &DomainError) -> String {
    match error {
        DomainError::EmptyItinerary => {
            "Your itinerary is empty. Add a flight, hotel or activity before confirming.".to_string()
        }
        DomainError::MissingCustomerInfo => {
            "Before I can confirm, I need your email address. Please share it so we can send your booking details.".to_string()
        }
        DomainError::AlreadyConfirmed => {
            "Your itinerary is already confirmed and can no longer be changed. Contact our team for changes.".to_string()
        }
        DomainError::Duplicate { kind, id } => {
            format!("{} is already in your itinerary as a {}.", id, kind)
        }
        DomainError::NotFound { entity, id } => {
            format!("I couldn't find {} {} in our catalog.", entity.to_lowercase(), id)
        }
        other => other.to_string(),
    }
}

pub(crate) fn admin_forwarded() -> String {
    "I've passed your question on to our travel team. A staff member will get back to you shortly."
        .to_string()
}
