//! Security-focused logging module to track authentication events
//!
//! Events never carry a password or a raw token. Tokens are identified by
//! their fingerprint only.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Types of security events to track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    AuthenticationFailed { token_id: Option<String>, reason: String },
    AuthenticationSuccess { user_id: String },
    LoginFailed { email: String },
    RegistrationRejected { email: String, reason: String },
    TokenIssued { user_id: String, token_id: String },
    TokenRevoked { user_id: String, token_id: String },
}

impl SecurityEvent {
    /// Stable key used for counters and alert thresholds
    pub fn key(&self) -> &'static str {
        match self {
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed",
            SecurityEvent::AuthenticationSuccess { .. } => "auth_success",
            SecurityEvent::LoginFailed { .. } => "login_failed",
            SecurityEvent::RegistrationRejected { .. } => "registration_rejected",
            SecurityEvent::TokenIssued { .. } => "token_issued",
            SecurityEvent::TokenRevoked { .. } => "token_revoked",
        }
    }
}

#[derive(Debug, Clone)]
struct TimestampedEvent {
    event: SecurityEvent,
    timestamp: Instant,
}

/// Security logger for tracking and alerting on security events
pub struct SecurityLogger {
    events: RwLock<Vec<TimestampedEvent>>,
    event_counts: RwLock<HashMap<&'static str, usize>>,
    max_events: usize,
    alert_thresholds: HashMap<&'static str, usize>,
}

impl SecurityLogger {
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Logger keeping at most `max_events` recent events
    pub fn with_capacity(max_events: usize) -> Self {
        let mut alert_thresholds = HashMap::new();
        alert_thresholds.insert("auth_failed", 20);
        alert_thresholds.insert("login_failed", 5);
        alert_thresholds.insert("registration_rejected", 20);

        Self {
            events: RwLock::new(Vec::new()),
            event_counts: RwLock::new(HashMap::new()),
            max_events,
            alert_thresholds,
        }
    }

    /// Log a security event
    pub async fn log_event(&self, event: SecurityEvent) {
        let event_key = event.key();

        {
            let mut events = self.events.write().await;
            events.push(TimestampedEvent {
                event: event.clone(),
                timestamp: Instant::now(),
            });

            // Limit memory usage
            if events.len() > self.max_events {
                let events_to_remove = events.len() - self.max_events;
                events.drain(0..events_to_remove);
            }
        }

        {
            let mut counts = self.event_counts.write().await;
            let count = counts.entry(event_key).or_insert(0);
            *count += 1;

            if let Some(&threshold) = self.alert_thresholds.get(event_key) {
                if *count >= threshold {
                    log::error!(
                        "SECURITY ALERT: {} events of type '{}' detected, last: {:?}",
                        count,
                        event_key,
                        event
                    );
                    *count = 0;
                }
            }
        }

        match event {
            SecurityEvent::AuthenticationFailed { token_id, reason } => {
                log::warn!("SECURITY: Authentication failed - Token: {:?}, Reason: {}", token_id, reason);
            }
            SecurityEvent::AuthenticationSuccess { user_id } => {
                log::debug!("SECURITY: Authentication success - User: {}", user_id);
            }
            SecurityEvent::LoginFailed { email } => {
                log::warn!("SECURITY: Login failed - Email: {}", email);
            }
            SecurityEvent::RegistrationRejected { email, reason } => {
                log::info!("SECURITY: Registration rejected - Email: {}, Reason: {}", email, reason);
            }
            SecurityEvent::TokenIssued { user_id, token_id } => {
                log::info!("SECURITY: Token issued - User: {}, Token: {}", user_id, token_id);
            }
            SecurityEvent::TokenRevoked { user_id, token_id } => {
                log::info!("SECURITY: Token revoked - User: {}, Token: {}", user_id, token_id);
            }
        }
    }

    /// Get recent security events
    pub async fn get_recent_events(&self, duration: Duration) -> Vec<SecurityEvent> {
        let events = self.events.read().await;
        let now = Instant::now();

        events
            .iter()
            .filter(|event| now.duration_since(event.timestamp) < duration)
            .map(|event| event.event.clone())
            .collect()
    }

    /// Get event statistics
    pub async fn get_event_stats(&self) -> HashMap<&'static str, usize> {
        self.event_counts.read().await.clone()
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Global security logger instance
static SECURITY_LOGGER: OnceLock<Arc<SecurityLogger>> = OnceLock::new();

/// Initialize the global security logger
pub fn init_security_logger() {
    SECURITY_LOGGER.get_or_init(|| Arc::new(SecurityLogger::new()));
}

/// Get the global security logger
pub fn get_security_logger() -> Option<Arc<SecurityLogger>> {
    SECURITY_LOGGER.get().cloned()
}

/// Log a security event using the global logger, if one was initialised
pub async fn log_security_event(event: SecurityEvent) {
    if let Some(logger) = get_security_logger() {
        logger.log_event(event).await;
    }
}
