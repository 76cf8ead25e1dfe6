//! Console output formatter for concierge replies and admin views

use colored::Colorize;
use concierge_application::{AdminAnswer, BookingDetails, ChatReply, SessionDetails};
use concierge_domain::util::{preview, truncate_chars};
use concierge_domain::{Booking, BookingStatus, ChatEntry, Notification, Role, SessionSummary};
use serde_json::json;

/// Formats concierge output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    // ==================== Customer ====================

    /// Format a chat reply; `show_trace` appends the turn phases.
    pub fn format_reply(reply: &ChatReply, show_trace: bool) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Concierge:".cyan().bold()));
        output.push_str(&Self::indent(&reply.reply_text, "  "));
        output.push('\n');

        if let Some(booking_id) = &reply.booking_id {
            output.push_str(&format!(
                "\n{} {}\n",
                "Booking:".green().bold(),
                booking_id.as_str().green()
            ));
        }

        if show_trace {
            let phases = reply
                .trace
                .phases()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(" → ");
            output.push_str(&format!(
                "\n{} {} | {} {}{}\n",
                "intent:".dimmed(),
                reply.intent.as_str(),
                "phases:".dimmed(),
                phases,
                reply
                    .retrieval
                    .map(|r| format!(" | {} {}", "retrieval:".dimmed(), r))
                    .unwrap_or_default()
            ));
        }
        output
    }

    /// Format a chat reply as JSON
    pub fn format_reply_json(reply: &ChatReply) -> String {
        let value = json!({
            "session_id": reply.session_id.as_str(),
            "reply": reply.reply_text,
            "intent": reply.intent.as_str(),
            "preferences": reply.preferences,
            "itinerary_summary": reply.itinerary_summary_text,
            "confirmed": reply.confirmed,
            "booking_id": reply.booking_id.as_ref().map(|b| b.as_str()),
            "retrieval": reply.retrieval,
            "phases": reply.trace.phases().iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    // ==================== Admin ====================

    pub fn format_sessions(sessions: &[SessionSummary]) -> String {
        if sessions.is_empty() {
            return "No sessions yet.\n".dimmed().to_string();
        }
        let mut output = Self::section_header("Sessions");
        for s in sessions {
            output.push_str(&format!(
                "  {}  {}  {:<12} {:>3} msgs  {}\n",
                s.id.as_str().yellow(),
                s.created_at.format("%Y-%m-%d %H:%M"),
                s.destination.as_deref().unwrap_or("-"),
                s.message_count,
                if s.confirmed {
                    "confirmed".green().to_string()
                } else {
                    "planning".dimmed().to_string()
                }
            ));
        }
        output
    }

    pub fn format_session_details(details: &SessionDetails) -> String {
        let session = &details.session;
        let mut output = Self::header(&format!("Session {}", session.id()));
        output.push('\n');

        let prefs = session.preferences();
        output.push_str(&Self::section_header("Preferences"));
        let fields = [
            ("Destination", prefs.destination.clone()),
            ("Origin", prefs.origin.clone()),
            ("Start", prefs.start_date.map(|d| d.to_string())),
            ("End", prefs.end_date.map(|d| d.to_string())),
            ("Budget", prefs.budget.map(|b| format!("${:.0}", b))),
            ("Style", prefs.travel_style.map(|s| s.to_string())),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                output.push_str(&format!("  {:<12} {}\n", format!("{}:", label).cyan(), value));
            }
        }

        if let Some(customer) = session.customer() {
            output.push_str(&Self::section_header("Customer"));
            output.push_str(&format!("  {}\n", customer.email));
            if let Some(name) = &customer.name {
                output.push_str(&format!("  {}\n", name));
            }
            if let Some(phone) = &customer.phone {
                output.push_str(&format!("  {}\n", phone));
            }
        }

        output.push_str(&Self::section_header("Itinerary"));
        output.push_str(&Self::indent(
            &details
                .itinerary
                .summary_text(prefs.destination.as_deref()),
            "  ",
        ));
        output.push('\n');

        if let Some(booking) = &details.booking {
            output.push_str(&format!(
                "\n{} {} ({})\n",
                "Booking:".green().bold(),
                booking.id,
                Self::status(booking.status)
            ));
        }

        output.push_str(&Self::section_header("Conversation"));
        output.push_str(&Self::format_history(session.history()));
        output.push_str(&Self::footer());
        output
    }

    pub fn format_bookings(bookings: &[Booking]) -> String {
        if bookings.is_empty() {
            return "No bookings yet.\n".dimmed().to_string();
        }
        let mut output = Self::section_header("Bookings");
        for b in bookings {
            output.push_str(&format!(
                "  {}  {}  {:<24} {:>10}  {}\n",
                b.id.as_str().yellow(),
                b.created_at.format("%Y-%m-%d %H:%M"),
                truncate_chars(&b.customer.email, 24),
                format!("${:.2}", b.total_cost()),
                Self::status(b.status)
            ));
        }
        output
    }

    pub fn format_booking_details(details: &BookingDetails) -> String {
        let b = &details.booking;
        let mut output = Self::header(&format!("Booking {}", b.id));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Status:".cyan().bold(), Self::status(b.status)));
        output.push_str(&format!("{} {}\n", "Session:".cyan().bold(), b.session_id));
        output.push_str(&format!(
            "{} {}{}\n",
            "Customer:".cyan().bold(),
            b.customer.email,
            b.customer
                .name
                .as_ref()
                .map(|n| format!(" ({})", n))
                .unwrap_or_default()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Created:".cyan().bold(),
            b.created_at.format("%Y-%m-%d %H:%M UTC")
        ));
        output.push_str(&format!("{} {}\n", "Summary:".cyan().bold(), b.chat_summary));

        output.push_str(&Self::section_header("Itinerary"));
        output.push_str(&Self::indent(
            &b.itinerary.summary_text(b.preferences.destination.as_deref()),
            "  ",
        ));
        output.push('\n');

        output.push_str(&Self::section_header("Conversation"));
        output.push_str(&Self::format_history(&details.chat_history));
        output.push_str(&Self::footer());
        output
    }

    pub fn format_notifications(notifications: &[Notification]) -> String {
        if notifications.is_empty() {
            return "No notifications.\n".dimmed().to_string();
        }
        let mut output = Self::section_header("Notifications");
        for n in notifications {
            let marker = if n.read { " ".normal() } else { "●".yellow() };
            let delivery = if n.is_pending() {
                format!("pending ({} attempts)", n.attempts()).red().to_string()
            } else {
                "delivered".green().to_string()
            };
            output.push_str(&format!(
                "{} {}  {}  {}\n",
                marker,
                n.id.as_str().dimmed(),
                n.headline(),
                delivery
            ));
        }
        output
    }

    pub fn format_admin_answer(answer: &AdminAnswer) -> String {
        let mut output = format!("{}\n", "Admin answer:".cyan().bold());
        output.push_str(&Self::indent(&answer.answer_text, "  "));
        output.push('\n');

        if !answer.knowledge.is_empty() {
            output.push_str(&format!("\n{}\n", "Related knowledge:".cyan().bold()));
            for doc in &answer.knowledge {
                output.push_str(&format!(
                    "  * [{:.2}] {}\n",
                    doc.score,
                    preview(&doc.document.content, 100)
                ));
            }
        }
        output
    }

    // ==================== Helpers ====================

    fn format_history(history: &[ChatEntry]) -> String {
        if history.is_empty() {
            return "  (no messages)\n".to_string();
        }
        let mut output = String::new();
        for entry in history {
            let who = match entry.role {
                Role::User => "customer".yellow().bold(),
                Role::Assistant => "concierge".cyan().bold(),
            };
            output.push_str(&format!(
                "  {} {} {}\n",
                entry.timestamp.format("%H:%M").to_string().as_str().dimmed(),
                who,
                preview(&entry.content, 160)
            ));
        }
        output
    }

    fn status(status: BookingStatus) -> String {
        match status {
            BookingStatus::Confirmed => status.as_str().green().to_string(),
            BookingStatus::Completed => status.as_str().blue().to_string(),
            BookingStatus::Cancelled => status.as_str().red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
