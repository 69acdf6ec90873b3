//! Host-side alert and notification feeds.
//!
//! Both feeds keep the newest entry first and drop the oldest once their
//! cap is reached. Acknowledged/read flags live here, not on the
//! evaluator's `TriggeredAlert`.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use twin_rules::schema::Severity;
use twin_rules::TriggeredAlert;

// ── Alerts ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AlertRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub alert: TriggeredAlert,
    pub acknowledged: bool,
}

#[derive(Debug)]
pub struct AlertFeed {
    records: VecDeque<AlertRecord>,
    max: usize,
}

impl AlertFeed {
    pub fn new(max: usize) -> Self {
        Self {
            records: VecDeque::new(),
            max: max.max(1),
        }
    }

    pub fn push(&mut self, alert: TriggeredAlert) -> Uuid {
        let id = Uuid::new_v4();
        self.records.push_front(AlertRecord {
            id,
            alert,
            acknowledged: false,
        });
        self.records.truncate(self.max);
        id
    }

    /// Returns false if no record has this id (it may have been evicted).
    pub fn acknowledge(&mut self, id: Uuid) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.acknowledged = true;
                true
            }
            None => false,
        }
    }

    pub fn acknowledge_all(&mut self) {
        self.records.iter_mut().for_each(|r| r.acknowledged = true);
    }

    pub fn unacknowledged(&self) -> usize {
        self.records.iter().filter(|r| !r.acknowledged).count()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &AlertRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

// ── Notifications ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug)]
pub struct NotificationFeed {
    items: VecDeque<Notification>,
    max: usize,
}

impl NotificationFeed {
    pub fn new(max: usize) -> Self {
        Self {
            items: VecDeque::new(),
            max: max.max(1),
        }
    }

    pub fn push_alert(&mut self, alert: &TriggeredAlert) -> Uuid {
        let id = Uuid::new_v4();
        self.items.push_front(Notification {
            id,
            severity: alert.severity,
            title: alert.rule_name.clone(),
            message: alert.message(),
            timestamp: alert.timestamp,
            read: false,
        });
        self.items.truncate(self.max);
        id
    }

    pub fn mark_read(&mut self, id: Uuid) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        self.items.iter_mut().for_each(|n| n.read = true);
    }

    pub fn unread(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
