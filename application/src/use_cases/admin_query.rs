//! Admin Query Engine: read-only answers over stored conversations.
//!
//! Answers are assembled from the target session's preferences, itinerary
//! and booking plus the chat entries that share terms with the question,
//! optionally augmented with knowledge-store matches. Nothing is written.

use crate::config::ConciergeParams;
use crate::error::ConciergeError;
use crate::ports::knowledge_store::KnowledgeStore;
use crate::use_cases::session_manager::SessionStateManager;
use concierge_domain::util::{preview, truncate_chars};
use concierge_domain::{
    BookingId, BookingRepository, Catalog, ChatEntry, DomainError, ItineraryEngine,
    ScoredDocument, Session, SessionId,
};
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{info, warn};

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "what", "which", "who", "how", "did", "does", "this",
    "that", "with", "from", "they", "their", "about", "have", "has", "any", "customer", "session",
    "booking", "tell", "show", "there", "were",
];

/// What an admin question is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminTarget {
    Session(SessionId),
    Booking(BookingId),
    /// Search every session's history
    All,
}

/// Answer to an admin question
#[derive(Debug, Clone)]
pub struct AdminAnswer {
    pub answer_text: String,
    /// Session the answer is about; `None` for cross-session searches
    pub session_id: Option<SessionId>,
    pub matched_messages: Vec<ChatEntry>,
    pub knowledge: Vec<ScoredDocument>,
}

/// Use case for answering admin questions.
pub struct AdminQueryUseCase {
    sessions: Arc<SessionStateManager>,
    bookings: Arc<dyn BookingRepository>,
    catalog: Arc<Catalog>,
    knowledge: Arc<dyn KnowledgeStore>,
    params: ConciergeParams,
}

impl AdminQueryUseCase {
    pub fn new(
        sessions: Arc<SessionStateManager>,
        bookings: Arc<dyn BookingRepository>,
        catalog: Arc<Catalog>,
        knowledge: Arc<dyn KnowledgeStore>,
        params: ConciergeParams,
    ) -> Self {
        Self {
            sessions,
            bookings,
            catalog,
            knowledge,
            params,
        }
    }

    pub async fn execute(
        &self,
        question: &str,
        target: AdminTarget,
    ) -> Result<AdminAnswer, ConciergeError> {
        if question.trim().is_empty() {
            return Err(DomainError::InvalidInput("question is empty".to_string()).into());
        }
        info!(question = truncate_chars(question, 100), target = ?target, "Admin query");
        let terms = query_terms(question);
        let knowledge = self.related_knowledge(question).await;

        let session = match target {
            AdminTarget::Session(ref id) => Some(self.sessions.load(id).await?),
            AdminTarget::Booking(ref id) => {
                let booking = self
                    .bookings
                    .load(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Booking", id.as_str()))?;
                Some(self.sessions.load(&booking.session_id).await?)
            }
            AdminTarget::All => None,
        };

        match session {
            Some(session) => self.answer_for_session(&session, &terms, knowledge).await,
            None => self.answer_across_sessions(&terms, knowledge).await,
        }
    }

    async fn related_knowledge(&self, question: &str) -> Vec<ScoredDocument> {
        let timeout = self.params.retrieval.source_timeout;
        let search = self.knowledge.search(question, self.params.retrieval.top_k);
        match tokio::time::timeout(timeout, search).await {
            Ok(Ok(docs)) => docs
                .into_iter()
                .filter(|d| d.score >= self.params.retrieval.similarity_threshold)
                .collect(),
            Ok(Err(e)) => {
                warn!(error = %e, "Knowledge lookup for admin query failed");
                Vec::new()
            }
            Err(_) => {
                warn!("Knowledge lookup for admin query timed out");
                Vec::new()
            }
        }
    }

    async fn answer_for_session(
        &self,
        session: &Session,
        terms: &HashSet<String>,
        knowledge: Vec<ScoredDocument>,
    ) -> Result<AdminAnswer, ConciergeError> {
        let window = self.params.chat.history_window;
        let mut matched = rank_messages(session.history(), terms, window);
        let fell_back = matched.is_empty();
        if fell_back {
            matched = session.recent_history(window).to_vec();
        }

        let engine =
            ItineraryEngine::new(&self.catalog).with_default_nights(self.params.default_nights);
        let view = engine.view(session);
        let prefs = session.preferences();
        let or_unset = |v: Option<String>| v.unwrap_or_else(|| "not specified".to_string());

        let mut text = String::new();
        let _ = writeln!(
            text,
            "**Session {}** (started {})",
            session.id(),
            session.created_at().format("%Y-%m-%d %H:%M UTC")
        );
        let _ = writeln!(text, "- Destination: {}", or_unset(prefs.destination.clone()));
        let _ = writeln!(text, "- Origin: {}", or_unset(prefs.origin.clone()));
        let _ = writeln!(
            text,
            "- Dates: {} to {}",
            or_unset(prefs.start_date.map(|d| d.to_string())),
            or_unset(prefs.end_date.map(|d| d.to_string()))
        );
        let _ = writeln!(text, "- Budget: {}", or_unset(prefs.budget.map(|b| format!("${:.0}", b))));
        let _ = writeln!(
            text,
            "- Travel style: {}",
            or_unset(prefs.travel_style.map(|s| s.to_string()))
        );
        let _ = writeln!(
            text,
            "- Itinerary: {} flight(s), {} hotel(s), {} activity(ies), total ${:.2}, {}",
            view.flights.len(),
            view.hotels.len(),
            view.activities.len(),
            view.total_cost,
            if view.confirmed { "confirmed" } else { "not confirmed" }
        );
        if let Some(customer) = session.customer() {
            let _ = writeln!(text, "- Customer: {}", customer.email);
        }
        if let Some(booking_id) = session.booking_id() {
            match self.bookings.load(booking_id).await? {
                Some(booking) => {
                    let _ = writeln!(text, "- Booking: {} ({})", booking.id, booking.status);
                }
                None => {
                    let _ = writeln!(text, "- Booking: {}", booking_id);
                }
            }
        }
        let _ = writeln!(text, "- Messages: {}", session.message_count());

        text.push_str(if fell_back {
            "\n**Recent messages:**\n"
        } else {
            "\n**Relevant messages:**\n"
        });
        push_messages(&mut text, &matched);
        push_knowledge(&mut text, &knowledge);

        Ok(AdminAnswer {
            answer_text: text.trim_end().to_string(),
            session_id: Some(session.id().clone()),
            matched_messages: matched,
            knowledge,
        })
    }

    async fn answer_across_sessions(
        &self,
        terms: &HashSet<String>,
        knowledge: Vec<ScoredDocument>,
    ) -> Result<AdminAnswer, ConciergeError> {
        let sessions = self.sessions.list().await?;
        let mut hits: Vec<(usize, &Session, &ChatEntry)> = sessions
            .iter()
            .flat_map(|s| s.history().iter().map(move |e| (overlap(e, terms), s, e)))
            .filter(|(score, _, _)| *score > 0)
            .collect();
        hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.2.timestamp.cmp(&b.2.timestamp)));
        hits.truncate(self.params.chat.history_window);

        let distinct: HashSet<&SessionId> = hits.iter().map(|(_, s, _)| s.id()).collect();
        let mut text = format!(
            "Found {} matching message(s) across {} session(s).\n",
            hits.len(),
            distinct.len()
        );
        for (_, session, entry) in &hits {
            let _ = writeln!(
                text,
                "- [{}] {}: {}",
                session.id(),
                entry.role.as_str(),
                preview(&entry.content, 200)
            );
        }
        push_knowledge(&mut text, &knowledge);

        let session_id = (distinct.len() == 1)
            .then(|| hits.first().map(|(_, s, _)| s.id().clone()))
            .flatten();
        Ok(AdminAnswer {
            answer_text: text.trim_end().to_string(),
            session_id,
            matched_messages: hits.into_iter().map(|(_, _, e)| e.clone()).collect(),
            knowledge,
        })
    }
}

fn query_terms(question: &str) -> HashSet<String> {
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2 && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

fn overlap(entry: &ChatEntry, terms: &HashSet<String>) -> usize {
    let lower = entry.content.to_lowercase();
    let words: HashSet<&str> = lower.split(|c: char| !c.is_alphanumeric()).collect();
    terms.iter().filter(|t| words.contains(t.as_str())).count()
}

/// Entries sharing terms with the question, best first, ties in history order.
fn rank_messages(history: &[ChatEntry], terms: &HashSet<String>, limit: usize) -> Vec<ChatEntry> {
    let mut scored: Vec<(usize, usize, &ChatEntry)> = history
        .iter()
        .enumerate()
        .map(|(i, e)| (overlap(e, terms), i, e))
        .filter(|(score, _, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().take(limit).map(|(_, _, e)| e.clone()).collect()
}

fn push_messages(text: &mut String, messages: &[ChatEntry]) {
    if messages.is_empty() {
        text.push_str("(no messages)\n");
    }
    for entry in messages {
        let _ = writeln!(
            text,
            "- {} [{}]: {}",
            entry.role.as_str(),
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            preview(&entry.content, 200)
        );
    }
}

fn push_knowledge(text: &mut String, knowledge: &[ScoredDocument]) {
    if knowledge.is_empty() {
        return;
    }
    text.push_str("\n**Related knowledge:**\n");
    for doc in knowledge.iter().take(3) {
        let _ = writeln!(
            text,
            "- [{}] {}",
            doc.document.kind.as_str().to_uppercase(),
            preview(&doc.document.content, 200)
        );
    }
}
