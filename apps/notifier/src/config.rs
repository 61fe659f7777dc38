//! # Notifier 設定
//!
//! 環境変数から Notifier サーバーの設定を読み込む。
//! 不正な値は起動時の [`ConfigError`] になる。

use std::{env, str::FromStr};

use agenda_infra::notification::SmtpSettings;
use chrono_tz::Tz;

use crate::{
    error::ConfigError,
    usecase::{NotificationSettings, notification::DispatchPolicy},
};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_TENANT_PROFILE_TABLE: &str = "negocios";

/// Notifier サーバーの設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// バインドアドレス
    pub host:                 String,
    /// ポート番号
    pub port:                 u16,
    /// DynamoDB Local のエンドポイント（未設定で AWS の既定設定）
    pub dynamodb_endpoint:    Option<String>,
    /// テナントプロフィールのテーブル名
    pub tenant_profile_table: String,
    /// 通知設定
    pub notification:         NotificationConfig,
}

/// 送信バックエンド
///
/// `NOTIFICATION_BACKEND` 環境変数で切り替える:
/// - `smtp`: SMTP サーバー経由で送信（既定）
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub enum NotificationBackend {
    Smtp(SmtpSettings),
    Noop,
}

/// 通知機能の設定
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:         NotificationBackend,
    /// システムの送信元アドレス（`SMTP_USER`）
    pub system_address:  String,
    pub dispatch_policy: DispatchPolicy,
    /// 日時をローカル表示するタイムゾーン
    pub timezone:        Tz,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 空文字の値は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars { lookup };

        Ok(Self {
            host:                 vars
                .optional("NOTIFIER_HOST")
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port:                 vars.parsed("NOTIFIER_PORT", DEFAULT_PORT)?,
            dynamodb_endpoint:    vars.optional("DYNAMODB_ENDPOINT"),
            tenant_profile_table: vars
                .optional("TENANT_PROFILE_TABLE")
                .unwrap_or_else(|| DEFAULT_TENANT_PROFILE_TABLE.to_string()),
            notification:         NotificationConfig::from_vars(&vars)?,
        })
    }
}

impl NotificationConfig {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let system_address = vars.required("SMTP_USER")?;

        let backend = match vars.optional("NOTIFICATION_BACKEND").as_deref() {
            None | Some("smtp") => NotificationBackend::Smtp(SmtpSettings {
                host:     vars.required("SMTP_HOST")?,
                port:     vars.parsed("SMTP_PORT", DEFAULT_SMTP_PORT)?,
                secure:   vars.parsed("SMTP_SECURE", true)?,
                user:     system_address.clone(),
                password: vars.required("SMTP_PASS")?,
            }),
            Some("noop") => NotificationBackend::Noop,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name:   "NOTIFICATION_BACKEND",
                    value:  other.to_string(),
                    reason: "smtp または noop を指定してください".to_string(),
                });
            }
        };

        Ok(Self {
            backend,
            system_address,
            dispatch_policy: vars
                .parsed("NOTIFICATION_DISPATCH_POLICY", DispatchPolicy::default())?,
            timezone: vars.parsed("APPOINTMENT_TIMEZONE", Tz::UTC)?,
        })
    }

    /// ユースケースに渡す設定
    pub fn settings(&self) -> NotificationSettings {
        NotificationSettings {
            system_address:  self.system_address.clone(),
            timezone:        self.timezone,
            dispatch_policy: self.dispatch_policy,
        }
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn parsed<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(value) = self.optional(name) else {
            return Ok(default);
        };
        value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        })
    }
}
