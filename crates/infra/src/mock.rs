//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! agenda-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashSet,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use agenda_domain::{
    calendar::{CalendarError, CalendarEvent},
    notification::{EmailMessage, NotificationError},
    tenant::{TenantId, TenantProfile},
};
use async_trait::async_trait;

use crate::{
    calendar::CalendarEncoder,
    error::InfraError,
    notification::NotificationSender,
    repository::TenantProfileRepository,
};

// ===== MockTenantProfileRepository =====

#[derive(Clone, Default)]
pub struct MockTenantProfileRepository {
    profiles: Arc<Mutex<Vec<(TenantId, TenantProfile)>>>,
    failure:  Option<String>,
    lookups:  Arc<AtomicUsize>,
}

impl MockTenantProfileRepository {
    /// プロフィールを 1 件も持たないリポジトリ
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての検索がストア障害として失敗するリポジトリ
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn add_profile(&self, id: TenantId, profile: TenantProfile) {
        self.profiles.lock().unwrap().push((id, profile));
    }

    /// `find_by_id` が呼ばれた回数
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TenantProfileRepository for MockTenantProfileRepository {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<TenantProfile>, InfraError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(InfraError::dynamo_db(message.clone()));
        }

        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|(tenant_id, _)| tenant_id == id)
            .map(|(_, profile)| profile.clone()))
    }
}

// ===== MockNotificationSender =====

/// 送信したメールを記録するモック
///
/// `fail_for` で指定した宛先への送信は `SendFailed` を返す。
/// 失敗した送信も `attempted_emails` には記録される。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:      Arc<Mutex<Vec<EmailMessage>>>,
    attempted: Arc<Mutex<Vec<EmailMessage>>>,
    failing:   Arc<Mutex<HashSet<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_for(&self, address: impl Into<String>) {
        self.failing.lock().unwrap().insert(address.into());
    }

    /// 送信に成功したメール
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// 成否を問わず送信を試みたメール
    pub fn attempted_emails(&self) -> Vec<EmailMessage> {
        self.attempted.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.attempted.lock().unwrap().push(email.clone());

        if self.failing.lock().unwrap().contains(&email.to) {
            return Err(NotificationError::SendFailed(format!(
                "モック送信失敗: {}",
                email.to
            )));
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ===== FailingCalendarEncoder =====

/// 常にエンコードに失敗するカレンダーエンコーダ
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingCalendarEncoder;

impl CalendarEncoder for FailingCalendarEncoder {
    fn encode(&self, _event: &CalendarEvent) -> Result<Vec<u8>, CalendarError> {
        Err(CalendarError::MissingValue("title"))
    }
}
