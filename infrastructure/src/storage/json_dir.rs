//! JSON-directory adapters
//!
//! Each record is a `<key>.json` file in a per-collection directory:
//!
//! ```text
//! <data_dir>/
//!   sessions/<session-id>.json
//!   bookings/TRV-XXXXXX.json
//!   notifications/<uuid>.json
//! ```
//!
//! Writes go to a temporary file that is renamed over the target, so a
//! crash never leaves a half-written record behind.

use async_trait::async_trait;
use concierge_application::NotificationOutbox;
use concierge_domain::{
    Booking, BookingId, BookingRepository, Notification, RepositoryError, Session, SessionId,
    SessionRepository,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One collection directory of JSON records
struct JsonDir {
    root: PathBuf,
}

impl JsonDir {
    fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Keys come from user input; anything outside `[A-Za-z0-9_-]` is
    /// percent-escaped so a key can never leave the directory.
    fn record_path(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                name.push(byte as char);
            } else {
                name.push_str(&format!("%{:02X}", byte));
            }
        }
        name.push_str(".json");
        self.root.join(name)
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RepositoryError> {
        let path = self.record_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => parse(&path, &bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), RepositoryError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(&self.root, e))?;

        let path = self.record_path(key);
        let json = serde_json::to_vec_pretty(value).map_err(|e| RepositoryError::Corrupt {
            id: key.to_string(),
            message: e.to_string(),
        })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, e))?;
        debug!(path = %path.display(), "Record written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        let path = self.record_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Record removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// Every readable record. Unparseable files are skipped with a warning.
    async fn read_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, RepositoryError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.root, e)),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.root, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| io_error(&path, e))?;
            match parse(&path, &bytes) {
                Ok(record) => records.push(record),
                Err(e) => warn!(error = %e, "Skipping unreadable record"),
            }
        }
        Ok(records)
    }
}

fn parse<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, RepositoryError> {
    serde_json::from_slice(bytes).map_err(|e| RepositoryError::Corrupt {
        id: path.display().to_string(),
        message: e.to_string(),
    })
}

fn io_error(path: &Path, e: std::io::Error) -> RepositoryError {
    RepositoryError::Io(format!("{}: {}", path.display(), e))
}

// ==================== Sessions ====================

pub struct JsonSessionRepository {
    dir: JsonDir,
}

impl JsonSessionRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: JsonDir::new(data_dir.as_ref().join("sessions")),
        }
    }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        self.dir.read(id.as_str()).await
    }

    async fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        self.dir.write(session.id().as_str(), session).await
    }

    async fn list(&self) -> Result<Vec<Session>, RepositoryError> {
        let mut sessions: Vec<Session> = self.dir.read_all().await?;
        sessions.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(sessions)
    }
}

// ==================== Bookings ====================

pub struct JsonBookingRepository {
    dir: JsonDir,
}

impl JsonBookingRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: JsonDir::new(data_dir.as_ref().join("bookings")),
        }
    }
}

#[async_trait]
impl BookingRepository for JsonBookingRepository {
    async fn load(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        self.dir.read(id.as_str()).await
    }

    async fn save(&self, booking: &Booking) -> Result<(), RepositoryError> {
        self.dir.write(booking.id.as_str(), booking).await
    }

    async fn delete(&self, id: &BookingId) -> Result<(), RepositoryError> {
        self.dir.remove(id.as_str()).await
    }

    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        self.dir.read_all().await
    }
}

// ==================== Notifications ====================

pub struct JsonOutbox {
    dir: JsonDir,
}

impl JsonOutbox {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: JsonDir::new(data_dir.as_ref().join("notifications")),
        }
    }
}

#[async_trait]
impl NotificationOutbox for JsonOutbox {
    async fn enqueue(&self, notification: &Notification) -> Result<(), RepositoryError> {
        self.dir.write(&notification.id, notification).await
    }

    async fn update(&self, notification: &Notification) -> Result<(), RepositoryError> {
        self.dir.write(&notification.id, notification).await
    }

    async fn get(&self, id: &str) -> Result<Option<Notification>, RepositoryError> {
        self.dir.read(id).await
    }

    async fn remove(&self, id: &str) -> Result<(), RepositoryError> {
        self.dir.remove(id).await
    }

    async fn list(&self) -> Result<Vec<Notification>, RepositoryError> {
        self.dir.read_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use concierge_domain::{BookingStatus, CustomerInfo, ItineraryView, Preferences};

    fn booking(id: &str) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::parse(id).unwrap(),
            session_id: SessionId::new("s1"),
            customer: CustomerInfo::new("ana@example.com", None, None).unwrap(),
            preferences: Preferences::default(),
            itinerary: ItineraryView {
                flights: vec![],
                hotels: vec![],
                activities: vec![],
                nights: 1,
                total_cost: 350.0,
                confirmed: true,
            },
            chat_summary: String::new(),
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_record_path_escapes_separators() {
        let dir = JsonDir::new(PathBuf::from("/data/sessions"));
        assert_eq!(
            dir.record_path("abc-123_x"),
            PathBuf::from("/data/sessions/abc-123_x.json")
        );
        assert_eq!(
            dir.record_path("../etc"),
            PathBuf::from("/data/sessions/%2E%2E%2Fetc.json")
        );
    }

    #[tokio::test]
    async fn test_session_round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        {
            let repo = JsonSessionRepository::new(dir.path());
            let mut session = Session::new(SessionId::new("late"), now);
            session.append_message(concierge_domain::Role::User, "hello", now);
            repo.save(&session).await.unwrap();
            repo.save(&Session::new(SessionId::new("early"), now - Duration::hours(1)))
                .await
                .unwrap();
        }

        let repo = JsonSessionRepository::new(dir.path());
        let loaded = repo.load(&SessionId::new("late")).await.unwrap().unwrap();
        assert_eq!(loaded.message_count(), 1);
        let ids: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonBookingRepository::new(dir.path().join("nowhere"));
        assert!(repo.list().await.unwrap().is_empty());
        assert!(
            repo.load(&BookingId::parse("TRV-ABC123").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_booking_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonBookingRepository::new(dir.path());
        let b = booking("TRV-DEL001");
        repo.save(&b).await.unwrap();
        repo.delete(&b.id).await.unwrap();
        assert!(repo.load(&b.id).await.unwrap().is_none());
        repo.delete(&b.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_booking_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonBookingRepository::new(dir.path());
        let mut b = booking("TRV-ABC123");
        repo.save(&b).await.unwrap();
        b.status = BookingStatus::Cancelled;
        repo.save(&b).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_skipped_in_list() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonBookingRepository::new(dir.path());
        repo.save(&booking("TRV-ABC123")).await.unwrap();
        std::fs::write(dir.path().join("bookings/TRV-BAD000.json"), "{ not json").unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 1);
        let err = repo
            .load(&BookingId::parse("TRV-BAD000").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_outbox_update() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = JsonOutbox::new(dir.path());
        let mut n = Notification::for_booking("n-1", &booking("TRV-ABC123"), Utc::now());
        outbox.enqueue(&n).await.unwrap();
        n.read = true;
        outbox.update(&n).await.unwrap();
        assert!(outbox.get("n-1").await.unwrap().unwrap().read);
        assert_eq!(outbox.list().await.unwrap().len(), 1);
    }
}
