//! Itinerary resolved against the catalog.

use crate::catalog::entities::{Activity, Flight, Hotel};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Itinerary with every selection resolved to its current catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryView {
    pub flights: Vec<Flight>,
    pub hotels: Vec<Hotel>,
    pub activities: Vec<Activity>,
    /// Nights each hotel is charged for
    pub nights: u32,
    pub total_cost: f64,
    pub confirmed: bool,
}

impl ItineraryView {
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty() && self.hotels.is_empty() && self.activities.is_empty()
    }

    /// Markdown summary shown to the customer.
    pub fn summary_text(&self, destination: Option<&str>) -> String {
        if self.is_empty() {
            return "Your itinerary is empty. Start by searching for flights, hotels, or activities!"
                .to_string();
        }

        let mut out = String::from("**Your Travel Itinerary**\n\n");
        if let Some(dest) = destination {
            let _ = write!(out, "**Destination:** {}\n\n", dest);
        }
        if !self.flights.is_empty() {
            out.push_str("**Flights:**\n");
            for f in &self.flights {
                let _ = writeln!(
                    out,
                    "- {} ({}): {} → {} (${:.2})",
                    f.airline, f.id, f.from, f.to, f.price
                );
            }
            out.push('\n');
        }
        if !self.hotels.is_empty() {
            out.push_str("**Hotels:**\n");
            for h in &self.hotels {
                let _ = writeln!(
                    out,
                    "- {} ({}) - ${:.2}/night × {} night(s)",
                    h.name, h.id, h.price_per_night, self.nights
                );
            }
            out.push('\n');
        }
        if !self.activities.is_empty() {
            out.push_str("**Activities:**\n");
            for a in &self.activities {
                let _ = writeln!(out, "- {} ({}) (${:.2})", a.name, a.id, a.price);
            }
            out.push('\n');
        }

        let _ = write!(out, "**Estimated Total:** ${:.2}\n\n", self.total_cost);
        if self.confirmed {
            out.push_str("✅ **Booking Confirmed!**");
        } else {
            out.push_str("Type **'confirm booking'** to finalize your itinerary!");
        }
        out
    }
}
