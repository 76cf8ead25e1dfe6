//! Application layer for travel-concierge
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod error;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatParams, ConciergeParams, NotificationParams, RetrievalParams};
pub use error::ConciergeError;
pub use ports::{
    evaluation_logger::{EvaluationEvent, EvaluationLogger, NoEvaluationLogger},
    external_fetcher::{ExternalFetcher, FetchError, NoExternalFetcher},
    knowledge_store::{KnowledgeError, KnowledgeStore},
    notification::{
        NoNotificationChannel, NotificationChannel, NotificationError, NotificationOutbox,
    },
};
pub use use_cases::admin_query::{AdminAnswer, AdminQueryUseCase, AdminTarget};
pub use use_cases::chat_turn::{
    ChatInput, ChatReply, ChatTurnUseCase, TurnPhase, TurnTrace,
};
pub use use_cases::notify::NotificationWorkflow;
pub use use_cases::retrieval::{
    KnowledgeStoreSource, RetrievalOrigin, RetrievalOutcome, RetrievalRouter, RetrievalSource,
    SourceError, WebSource,
};
pub use use_cases::service::{BookingDetails, ConciergeService, SessionDetails};
pub use use_cases::session_manager::{SessionStateManager, SessionTxn};
