//! # カレンダー招待
//!
//! 予約から生成するカレンダーイベント（iCalendar の VEVENT 相当）の記述と検証。
//!
//! ## 設計方針
//!
//! - **ローカル日時フィールド**: 開始・終了は `(年, 月, 日, 時, 分)` の組で保持する。
//!   タイムゾーン情報は付与しない（フローティング時刻）。絶対時刻からの変換は呼び出し側の責務
//! - **構造化エラー**: 不正な入力は [`CalendarError`] で返し、panic しない
//! - **エンコードの分離**: バイト列への変換はインフラ層の `CalendarEncoder` が担う

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use strum::IntoStaticStr;
use thiserror::Error;

/// 添付ファイル名
pub const CALENDAR_FILENAME: &str = "cita.ics";

/// 添付ファイルの Content-Type
pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar";

/// リマインダーの既定の通知タイミング（開始前の分数）
pub const DEFAULT_REMINDER_MINUTES: u32 = 30;

/// カレンダー招待の構築エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// 日時フィールドが範囲外
    #[error("日時フィールド {field} が範囲外です: {value}")]
    FieldOutOfRange { field: &'static str, value: i64 },

    /// 開始が終了より後、または同時刻
    #[error("開始 {start} は終了 {end} より前である必要があります")]
    NonMonotonic { start: String, end: String },

    /// 必須項目が空
    #[error("{0} は必須です")]
    MissingValue(&'static str),
}

/// ローカル日時フィールド（年, 月 1 始まり, 日, 時, 分）
///
/// 構築時に暦として妥当であることを検証済み。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CalendarFields {
    year:   i32,
    month:  u32,
    day:    u32,
    hour:   u32,
    minute: u32,
}

impl CalendarFields {
    /// 各フィールドを検証して作成する
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    ) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::FieldOutOfRange {
                field: "month",
                value: i64::from(month),
            });
        }
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(CalendarError::FieldOutOfRange {
                field: "day",
                value: i64::from(day),
            });
        }
        if hour > 23 {
            return Err(CalendarError::FieldOutOfRange {
                field: "hour",
                value: i64::from(hour),
            });
        }
        if minute > 59 {
            return Err(CalendarError::FieldOutOfRange {
                field: "minute",
                value: i64::from(minute),
            });
        }

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
        })
    }

    /// ローカル日時から分単位に切り捨てて作成する
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self {
            year:   value.year(),
            month:  value.month(),
            day:    value.day(),
            hour:   value.hour(),
            minute: value.minute(),
        }
    }

    /// ローカル日時に変換する
    ///
    /// 構築時に検証済みのため失敗しない。
    pub fn to_naive(&self) -> NaiveDateTime {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).unwrap_or_default();
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default();
        date.and_time(time)
    }
}

/// イベントのステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum EventStatus {
    Tentative,
    Confirmed,
    Cancelled,
}

/// 主催者（テナント）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organizer {
    pub name:  String,
    pub email: String,
}

/// リマインダーのアクション種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum AlarmAction {
    /// カレンダーアプリ上での表示通知
    Display,
}

/// 開始前に発火するリマインダー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderAlarm {
    pub action:         AlarmAction,
    /// 開始の何分前に通知するか
    pub minutes_before: u32,
}

impl ReminderAlarm {
    /// 開始 `minutes_before` 分前の表示通知
    pub fn display_before(minutes_before: u32) -> Self {
        Self {
            action: AlarmAction::Display,
            minutes_before,
        }
    }
}

/// カレンダーイベント
///
/// エンコーダへの入力。`validate()` を通過したものだけをエンコードする。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub title:       String,
    pub description: String,
    pub start:       CalendarFields,
    pub end:         CalendarFields,
    pub location:    String,
    pub status:      EventStatus,
    pub organizer:   Organizer,
    pub alarms:      Vec<ReminderAlarm>,
}

impl CalendarEvent {
    /// イベントの整合性を検証する
    ///
    /// - 開始 < 終了
    /// - タイトルが空でない
    /// - 主催者のメールアドレスが空でない
    pub fn validate(&self) -> Result<(), CalendarError> {
        if self.start >= self.end {
            return Err(CalendarError::NonMonotonic {
                start: self.start.to_naive().to_string(),
                end:   self.end.to_naive().to_string(),
            });
        }
        if self.title.trim().is_empty() {
            return Err(CalendarError::MissingValue("title"));
        }
        if self.organizer.email.trim().is_empty() {
            return Err(CalendarError::MissingValue("organizer.email"));
        }
        Ok(())
    }
}
