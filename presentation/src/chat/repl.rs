//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::{AdminScope, ReplCommand};
use crate::ConsoleFormatter;
use colored::Colorize;
use concierge_application::{AdminTarget, ConciergeError, ConciergeService};
use concierge_domain::{BookingId, DomainError, SessionId};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use std::sync::Arc;

/// Entries kept in the history file
const HISTORY_SIZE: usize = 1000;

/// Interactive chat REPL
pub struct ChatRepl {
    service: Arc<ConciergeService>,
    session_id: Option<SessionId>,
    show_trace: bool,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(service: Arc<ConciergeService>) -> Self {
        Self {
            service,
            session_id: None,
            show_trace: false,
            history_path: dirs::data_dir().map(|p| p.join("travel-concierge").join("history.txt")),
        }
    }

    /// Resume an existing session
    pub fn with_session(mut self, session_id: Option<SessionId>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Show intent, phases and retrieval source after each reply
    pub fn with_trace(mut self, show: bool) -> Self {
        self.show_trace = show;
        self
    }

    /// Override the history file; `None` keeps history in memory only
    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => eprintln!("{} history disabled: {}", "Warning:".yellow(), e),
            }
        }
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("concierge".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)).await {
                            break;
                        }
                        continue;
                    }
                    self.process_message(line).await;
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              Travel Concierge               │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        match &self.session_id {
            Some(id) => println!("Session: {}", id.as_str().yellow()),
            None => println!("Tell me where you'd like to go. Type /help for commands."),
        }
        println!(
            "{} {}",
            "Knowledge sources:".dimmed(),
            self.service.retrieval_sources().join(" → ")
        );
        println!();
    }

    async fn process_message(&mut self, message: &str) {
        println!();
        match self.service.chat(message, self.session_id.as_ref()).await {
            Ok(reply) => {
                if self.session_id.as_ref() != Some(&reply.session_id) {
                    println!("{} {}", "Session:".dimmed(), reply.session_id.as_str().dimmed());
                }
                self.session_id = Some(reply.session_id.clone());
                println!("{}", ConsoleFormatter::format_reply(&reply, self.show_trace));
            }
            Err(e) if e.is_not_found() && self.session_id.is_some() => {
                eprintln!("{} {}", "Error:".red(), e);
                eprintln!("Your next message will start a new session.");
                self.session_id = None;
            }
            Err(e) => eprintln!("{} {}", "Error:".red(), e),
        }
        println!();
    }

    /// Current session, creating one if needed.
    async fn ensure_session(&mut self) -> Result<SessionId, ConciergeError> {
        if let Some(id) = &self.session_id {
            return Ok(id.clone());
        }
        let session = self.service.create_session().await?;
        let id = session.id().clone();
        println!("{} {}", "Session:".dimmed(), id.as_str().dimmed());
        self.session_id = Some(id.clone());
        Ok(id)
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        if let Err(e) = self.run_command(command.clone()).await {
            eprintln!("{} {}", "Error:".red(), e);
        }
        command == ReplCommand::Quit
    }

    async fn run_command(&mut self, command: ReplCommand) -> Result<(), ConciergeError> {
        match command {
            ReplCommand::Quit => println!("Bye!"),
            ReplCommand::Help => {
                println!();
                println!("{}", ReplCommand::help());
                println!();
            }
            ReplCommand::New => {
                self.session_id = None;
                println!("Starting over. Your next message opens a new session.");
            }
            ReplCommand::Use(id) => {
                let id = SessionId::new(id);
                let details = self.service.get_session_details(&id).await?;
                println!(
                    "Continuing session {} ({} messages).",
                    id.as_str().yellow(),
                    details.session.message_count()
                );
                self.session_id = Some(id);
            }
            ReplCommand::Add { kind, item_id } => {
                let session_id = self.ensure_session().await?;
                let view = self.service.add_item(&session_id, &kind, &item_id).await?;
                println!("{} {}", "✓".green(), format!("Added {}", item_id.to_uppercase()));
                println!("{}", ConsoleFormatter::indent(&view.summary_text(None), "  "));
            }
            ReplCommand::Remove { kind, item_id } => {
                let session_id = self.ensure_session().await?;
                let view = self.service.remove_item(&session_id, &kind, &item_id).await?;
                println!("{}", ConsoleFormatter::indent(&view.summary_text(None), "  "));
            }
            ReplCommand::Itinerary => {
                let session_id = self.ensure_session().await?;
                let details = self.service.get_session_details(&session_id).await?;
                let destination = details.session.preferences().destination.clone();
                println!(
                    "{}",
                    ConsoleFormatter::indent(
                        &details.itinerary.summary_text(destination.as_deref()),
                        "  "
                    )
                );
            }
            ReplCommand::Email { email, name, phone } => {
                let session_id = self.ensure_session().await?;
                let customer = self
                    .service
                    .set_customer_info(&session_id, &email, name.as_deref(), phone.as_deref())
                    .await?;
                println!("{} Contact saved: {}", "✓".green(), customer.email);
            }
            ReplCommand::Trace => {
                self.show_trace = !self.show_trace;
                println!("Trace {}", if self.show_trace { "on" } else { "off" });
            }
            ReplCommand::Sessions => {
                let sessions = self.service.list_sessions().await?;
                println!("{}", ConsoleFormatter::format_sessions(&sessions));
            }
            ReplCommand::Session(id) => {
                let id = match id {
                    Some(id) => SessionId::new(id),
                    None => self.ensure_session().await?,
                };
                let details = self.service.get_session_details(&id).await?;
                println!("{}", ConsoleFormatter::format_session_details(&details));
            }
            ReplCommand::Bookings => {
                let bookings = self.service.list_bookings().await?;
                println!("{}", ConsoleFormatter::format_bookings(&bookings));
            }
            ReplCommand::Booking(id) => {
                let details = self.service.get_booking(&id).await?;
                println!("{}", ConsoleFormatter::format_booking_details(&details));
            }
            ReplCommand::Status { booking_id, status } => {
                let booking = self
                    .service
                    .update_booking_status(&booking_id, &status)
                    .await?;
                println!("{} {} is now {}", "✓".green(), booking.id, booking.status);
            }
            ReplCommand::Admin { scope, question } => {
                let target = match scope {
                    AdminScope::All => AdminTarget::All,
                    AdminScope::Session(id) => AdminTarget::Session(SessionId::new(id)),
                    AdminScope::Booking(id) => AdminTarget::Booking(
                        BookingId::parse(&id)
                            .map_err(|_| DomainError::not_found("Booking", id.as_str()))?,
                    ),
                };
                let answer = self.service.admin_query(&question, target).await?;
                println!("{}", ConsoleFormatter::format_admin_answer(&answer));
            }
            ReplCommand::Notifications => {
                let notifications = self.service.list_notifications().await?;
                println!("{}", ConsoleFormatter::format_notifications(&notifications));
            }
            ReplCommand::Read(id) => {
                let notification = self.service.mark_notification_read(&id).await?;
                println!("{} {}", "✓".green(), notification.headline());
            }
            ReplCommand::Retry => {
                let delivered = self.service.retry_pending_notifications().await?;
                println!("Delivered {} pending notification(s).", delivered);
            }
            ReplCommand::Usage(usage) => println!("Usage: {}", usage),
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        Ok(())
    }
}
