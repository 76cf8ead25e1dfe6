//! Slash command parsing

use concierge_domain::ItemId;

/// Target of an `/admin` question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminScope {
    All,
    Session(String),
    Booking(String),
}

/// A parsed `/command` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    /// Forget the current session; the next message starts a new one
    New,
    /// Switch to an existing session
    Use(String),
    Add { kind: String, item_id: String },
    Remove { kind: String, item_id: String },
    Itinerary,
    Email {
        email: String,
        name: Option<String>,
        phone: Option<String>,
    },
    Trace,
    Sessions,
    Session(Option<String>),
    Bookings,
    Booking(String),
    Status { booking_id: String, status: String },
    Admin { scope: AdminScope, question: String },
    Notifications,
    Read(String),
    Retry,
    /// Known command with bad arguments; carries the usage line
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return ReplCommand::Unknown(String::new());
        };
        let args: Vec<&str> = words.collect();

        match head {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/new" => ReplCommand::New,
            "/use" => match args.as_slice() {
                [id] => ReplCommand::Use(id.to_string()),
                _ => ReplCommand::Usage("/use <session-id>"),
            },
            "/add" => match item_args(&args) {
                Some((kind, item_id)) => ReplCommand::Add { kind, item_id },
                None => ReplCommand::Usage("/add [flight|hotel|activity] <ID>"),
            },
            "/remove" | "/rm" => match item_args(&args) {
                Some((kind, item_id)) => ReplCommand::Remove { kind, item_id },
                None => ReplCommand::Usage("/remove [flight|hotel|activity] <ID>"),
            },
            "/itinerary" | "/it" => ReplCommand::Itinerary,
            "/email" => match args.split_first() {
                Some((email, rest)) => {
                    let (name, phone) = name_and_phone(rest);
                    ReplCommand::Email {
                        email: email.to_string(),
                        name,
                        phone,
                    }
                }
                None => ReplCommand::Usage("/email <address> [name...] [+phone]"),
            },
            "/trace" => ReplCommand::Trace,
            "/sessions" => ReplCommand::Sessions,
            "/session" => ReplCommand::Session(args.first().map(|s| s.to_string())),
            "/bookings" => ReplCommand::Bookings,
            "/booking" => match args.as_slice() {
                [id] => ReplCommand::Booking(id.to_string()),
                _ => ReplCommand::Usage("/booking <TRV-XXXXXX>"),
            },
            "/status" => match args.as_slice() {
                [id, status] => ReplCommand::Status {
                    booking_id: id.to_string(),
                    status: status.to_string(),
                },
                _ => ReplCommand::Usage("/status <TRV-XXXXXX> <completed|cancelled>"),
            },
            "/admin" => parse_admin(&args),
            "/notifications" | "/notes" => ReplCommand::Notifications,
            "/read" => match args.as_slice() {
                [id] => ReplCommand::Read(id.to_string()),
                _ => ReplCommand::Usage("/read <notification-id>"),
            },
            "/retry" => ReplCommand::Retry,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }

    pub fn help() -> &'static str {
        "Trip commands:
  /add [kind] <ID>       - Add a flight, hotel or activity (e.g. /add FL001)
  /remove [kind] <ID>    - Remove an item from the itinerary
  /itinerary, /it        - Show the itinerary and total cost
  /email <addr> [name]   - Save contact details (required to confirm)
  /new                   - Start over with a new session
  /use <session-id>      - Continue an existing session
  /trace                 - Toggle intent and phase display

Admin commands:
  /sessions              - List sessions
  /session [id]          - Session details (current session if omitted)
  /bookings              - List bookings
  /booking <id>          - Booking details with conversation
  /status <id> <status>  - Set booking status (completed, cancelled)
  /admin [session <id> | booking <id>] <question>
                         - Ask about a conversation
  /notifications         - Admin notification feed
  /read <id>             - Mark a notification read
  /retry                 - Retry undelivered notifications

  /help, /h, /?          - Show this help
  /quit, /exit, /q       - Exit"
    }
}

/// `<ID>` or `<kind> <ID>`; the kind is inferred from the id prefix.
fn item_args(args: &[&str]) -> Option<(String, String)> {
    match args {
        [id] => {
            let kind = ItemId::parse(id).ok()?.kind();
            Some((kind.as_str().to_string(), id.to_string()))
        }
        [kind, id] => Some((kind.to_lowercase(), id.to_string())),
        _ => None,
    }
}

/// A trailing word starting with `+` or a digit is the phone number.
fn name_and_phone(rest: &[&str]) -> (Option<String>, Option<String>) {
    let (phone, name_words) = match rest.split_last() {
        Some((last, init)) if last.starts_with('+') || last.starts_with(|c: char| c.is_ascii_digit()) => {
            (Some(last.to_string()), init)
        }
        _ => (None, rest),
    };
    let name = (!name_words.is_empty()).then(|| name_words.join(" "));
    (name, phone)
}

fn parse_admin(args: &[&str]) -> ReplCommand {
    const USAGE: &str = "/admin [session <id> | booking <id>] <question>";
    let (scope, question) = match args {
        ["session", id, rest @ ..] => (AdminScope::Session(id.to_string()), rest),
        ["booking", id, rest @ ..] => (AdminScope::Booking(id.to_string()), rest),
        rest => (AdminScope::All, rest),
    };
    if question.is_empty() {
        return ReplCommand::Usage(USAGE);
    }
    ReplCommand::Admin {
        scope,
        question: question.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_infers_kind() {
        assert_eq!(
            ReplCommand::parse("/add fl001"),
            ReplCommand::Add {
                kind: "flight".to_string(),
                item_id: "fl001".to_string()
            }
        );
        assert_eq!(
            ReplCommand::parse("/add Hotel HT002"),
            ReplCommand::Add {
                kind: "hotel".to_string(),
                item_id: "HT002".to_string()
            }
        );
        assert!(matches!(ReplCommand::parse("/add XX1"), ReplCommand::Usage(_)));
    }

    #[test]
    fn test_email_with_name_and_phone() {
        assert_eq!(
            ReplCommand::parse("/email ana@example.com Ana Lima +351912345678"),
            ReplCommand::Email {
                email: "ana@example.com".to_string(),
                name: Some("Ana Lima".to_string()),
                phone: Some("+351912345678".to_string()),
            }
        );
        assert_eq!(
            ReplCommand::parse("/email ana@example.com"),
            ReplCommand::Email {
                email: "ana@example.com".to_string(),
                name: None,
                phone: None,
            }
        );
    }

    #[test]
    fn test_admin_scopes() {
        assert_eq!(
            ReplCommand::parse("/admin booking TRV-ABC123 what dates?"),
            ReplCommand::Admin {
                scope: AdminScope::Booking("TRV-ABC123".to_string()),
                question: "what dates?".to_string(),
            }
        );
        assert_eq!(
            ReplCommand::parse("/admin who asked about visas"),
            ReplCommand::Admin {
                scope: AdminScope::All,
                question: "who asked about visas".to_string(),
            }
        );
        assert!(matches!(
            ReplCommand::parse("/admin session abc"),
            ReplCommand::Usage(_)
        ));
    }

    #[test]
    fn test_status_and_unknown() {
        assert_eq!(
            ReplCommand::parse("/status TRV-ABC123 cancelled"),
            ReplCommand::Status {
                booking_id: "TRV-ABC123".to_string(),
                status: "cancelled".to_string(),
            }
        );
        assert!(matches!(ReplCommand::parse("/status x"), ReplCommand::Usage(_)));
        assert_eq!(
            ReplCommand::parse("/models"),
            ReplCommand::Unknown("/models".to_string())
        );
    }
}
