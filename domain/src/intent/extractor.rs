//! Rule-based intent and preference extraction.
//!
//! Classification is keyword driven and deterministic. Item ids are found by
//! [`extract_item_ids`], which is versioned separately from these rules.

use super::entities::{ExtractedIntent, Intent};
use crate::catalog::item_id::extract_item_ids;
use crate::trip::itinerary::Itinerary;
use crate::trip::preferences::{PreferenceUpdate, Preferences, TravelStyle};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Cities recognised by name even without a "trip to ..." phrase.
pub const KNOWN_CITIES: &[&str] = &["paris", "london", "tokyo", "rome", "new york", "los angeles"];

const CONFIRM_PHRASES: &[&str] = &["confirm", "book it", "yes book", "proceed", "finalize", "finalise"];
const AFFIRMATIONS: &[&str] = &[
    "yes",
    "yes please",
    "sure",
    "ok",
    "okay",
    "sounds good",
    "go ahead",
    "let s do it",
    "lets do it",
];
const SELECTION_VERBS: &[&str] = &[
    "add", "book", "select", "choose", "reserve", "take", "want", "pick", "include",
];
const ADMIN_WORDS: &[&str] = &["admin", "administrator", "staff", "agent", "manager"];
const FLIGHT_WORDS: &[&str] = &["flight", "flights", "fly", "flying", "airplane", "plane", "planes"];
const HOTEL_WORDS: &[&str] = &[
    "hotel",
    "hotels",
    "stay",
    "staying",
    "accommodation",
    "accommodations",
    "room",
    "rooms",
    "lodging",
];
const ACTIVITY_WORDS: &[&str] = &[
    "activity",
    "activities",
    "things to do",
    "tour",
    "tours",
    "attraction",
    "attractions",
    "sightseeing",
];
const INFORMATION_TOPICS: &[&str] = &[
    "best time",
    "must see",
    "guide",
    "tips",
    "advice",
    "recommend",
    "recommendation",
    "recommendations",
    "visa",
    "weather",
    "currency",
    "language",
];

/// Words that end a captured place name.
const PLACE_END: &str = r"(?:\s+(?:for|in|on|with|next|this|from|to|and|by|at|during|under|around|between|budget|leaving|departing)\b|[,.?!;]|$)";

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("word regex"));

static DESTINATION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(?:trip|travel|go|visit|going|plan|planning|fly|flying|head|heading)\s+(?:to|for)\s+([a-z][a-z ]*?)",
        r"\b(?:want to|like to|planning to|love to|hoping to)\s+(?:visit|go to|see|explore)\s+([a-z][a-z ]*?)",
    ]
    .iter()
    .map(|head| Regex::new(&format!("{}{}", head, PLACE_END)).expect("destination regex"))
    .collect()
});

static ORIGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\bfrom\s+([a-z][a-z ]*?){}", PLACE_END)).expect("origin regex")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("date regex"));

static BUDGET_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"budget\s*(?:of|is|around|about|:|=)?\s*(?:around|about|~)?\s*\$?\s*(\d[\d,]*(?:\.\d+)?)\s*(k)?\b",
        r"\$\s*(\d[\d,]*(?:\.\d+)?)\s*(k)?\b",
        r"\b(\d[\d,]*(?:\.\d+)?)\s*(k)?\s*(?:dollars|usd|bucks)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("budget regex"))
    .collect()
});

static STYLE_RES: LazyLock<Vec<(TravelStyle, Regex)>> = LazyLock::new(|| {
    [
        (
            TravelStyle::Luxury,
            r"\b(?:luxury|luxurious|premium|upscale|five-star|5-star)\b",
        ),
        (
            TravelStyle::Moderate,
            r"\b(?:moderate|mid-range|midrange|mid range)\b",
        ),
        (
            TravelStyle::Budget,
            r"\bbudget[- ](?:trip|travel|traveller|traveler|hotel|hotels|style|option|options|stay|friendly)\b|\bon a budget\b|\b(?:cheap|cheapest|affordable|backpacker|backpacking)\b",
        ),
    ]
    .into_iter()
    .map(|(style, p)| (style, Regex::new(p).expect("style regex")))
    .collect()
});

/// Words that disqualify a captured place name.
const NOT_A_PLACE: &[&str] = &[
    "a", "an", "the", "my", "our", "this", "that", "some", "any", "me", "us", "it", "two",
    "three", "few", "day", "days", "week", "weeks", "month", "months", "night", "nights",
    "people", "person", "family", "business", "vacation", "holiday", "trip", "here", "there",
    "home", "work",
];

/// Classifies customer utterances into an [`ExtractedIntent`].
#[derive(Debug, Clone)]
pub struct IntentExtractor {
    known_cities: Vec<String>,
}

impl Default for IntentExtractor {
    fn default() -> Self {
        Self::with_known_cities(KNOWN_CITIES.iter().copied())
    }
}

impl IntentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an extractor that recognises the given city names.
    pub fn with_known_cities<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known_cities: Vec<String> = Vec::new();
        for city in cities {
            let city = city.as_ref().trim().to_lowercase();
            if !city.is_empty() && !known_cities.contains(&city) {
                known_cities.push(city);
            }
        }
        Self { known_cities }
    }

    /// Classify `text` given the session's current state.
    ///
    /// Pure: nothing is mutated. Preference updates only carry fields whose
    /// value differs from `preferences`.
    pub fn extract(
        &self,
        text: &str,
        preferences: &Preferences,
        itinerary: &Itinerary,
    ) -> ExtractedIntent {
        let lower = text.trim().to_lowercase();
        let tokens: Vec<&str> = WORD_RE.find_iter(&lower).map(|m| m.as_str()).collect();
        let item_ids = extract_item_ids(text);
        let updates = self.extract_preferences(text, preferences);
        let information_need = INFORMATION_TOPICS
            .iter()
            .find(|topic| has_phrase(&tokens, topic))
            .map(|topic| topic.to_string());

        let any = |phrases: &[&str]| phrases.iter().any(|p| has_phrase(&tokens, p));
        let pending_itinerary = !itinerary.is_empty() && !itinerary.is_confirmed();

        let intent = if !item_ids.is_empty() && any(SELECTION_VERBS) {
            Intent::AddItem
        } else if any(CONFIRM_PHRASES) {
            Intent::ConfirmBooking
        } else if pending_itinerary && AFFIRMATIONS.contains(&tokens.join(" ").as_str()) {
            Intent::ConfirmBooking
        } else if any(ADMIN_WORDS) {
            Intent::AdminQuery
        } else if any(FLIGHT_WORDS) {
            Intent::SearchFlights
        } else if any(HOTEL_WORDS) {
            Intent::SearchHotels
        } else if any(ACTIVITY_WORDS) {
            Intent::SearchActivities
        } else if information_need.is_some() {
            Intent::Smalltalk
        } else if !updates.is_empty() {
            Intent::RefinePreferences
        } else {
            Intent::Smalltalk
        };

        ExtractedIntent {
            intent,
            updates,
            item_ids,
            information_need,
            raw_text: text.to_string(),
        }
    }

    /// Preference fields mentioned in `text` that differ from `current`.
    pub fn extract_preferences(&self, text: &str, current: &Preferences) -> PreferenceUpdate {
        let lower = text.trim().to_lowercase();
        let tokens: Vec<&str> = WORD_RE.find_iter(&lower).map(|m| m.as_str()).collect();

        let origin = capture_place(&ORIGIN_RE, &lower);
        let destination = DESTINATION_RES
            .iter()
            .filter_map(|re| capture_place(re, &lower))
            .find(|place| origin.as_deref() != Some(place.as_str()))
            .or_else(|| {
                self.known_cities
                    .iter()
                    .filter(|city| origin.as_deref() != Some(city.as_str()))
                    .find(|city| has_phrase(&tokens, city))
                    .cloned()
            });

        let mut dates = DATE_RE
            .captures_iter(&lower)
            .filter_map(|c| NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok());
        let start_date = dates.next();
        let end_date = dates.next();

        let budget = BUDGET_RES.iter().find_map(|re| {
            let caps = re.captures(&lower)?;
            let amount: f64 = caps[1].replace(',', "").parse().ok()?;
            let amount = if caps.get(2).is_some() { amount * 1000.0 } else { amount };
            (amount > 0.0).then_some(amount)
        });

        let travel_style = STYLE_RES
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|(style, _)| *style);

        PreferenceUpdate {
            destination: changed(destination.map(|d| title_case(&d)), &current.destination),
            origin: changed(origin.map(|o| title_case(&o)), &current.origin),
            start_date: changed(start_date, &current.start_date),
            end_date: changed(end_date, &current.end_date),
            budget: changed(budget, &current.budget),
            travel_style: changed(travel_style, &current.travel_style),
        }
    }
}

/// Whether `tokens` contain the words of `phrase` consecutively.
fn has_phrase(tokens: &[&str], phrase: &str) -> bool {
    let words: Vec<&str> = phrase
        .split([' ', '-'])
        .filter(|w| !w.is_empty())
        .collect();
    !words.is_empty() && tokens.windows(words.len()).any(|w| w == words.as_slice())
}

fn capture_place(re: &Regex, lower: &str) -> Option<String> {
    re.captures_iter(lower).find_map(|caps| {
        let place = caps[1].trim();
        let words: Vec<&str> = place.split_whitespace().collect();
        let plausible = place.len() > 2
            && words.len() <= 3
            && !words.iter().any(|w| NOT_A_PLACE.contains(w));
        plausible.then(|| words.join(" "))
    })
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn changed<T: PartialEq>(new: Option<T>, current: &Option<T>) -> Option<T> {
    new.filter(|value| current.as_ref() != Some(value))
}
