//! # カレンダー招待エンコーダ
//!
//! [`CalendarEvent`] を iCalendar（RFC 5545）形式のバイト列に変換する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `CalendarEncoder` でエンコード方法を差し替え可能にする
//! - **panic しない**: 不正な入力は `CalendarError` で返す
//! - **フローティング時刻**: `DTSTART` / `DTEND` はタイムゾーンなしで出力する
//!   （受信者のカレンダーアプリがローカル時刻として解釈する）

use agenda_domain::calendar::{AlarmAction, CalendarError, CalendarEvent, EventStatus};
use chrono::Duration;
use icalendar::{
    Alarm,
    Calendar,
    CalendarDateTime,
    Component,
    Event,
    EventLike,
    EventStatus as IcalEventStatus,
    Property,
};

/// カレンダー招待エンコーダ
pub trait CalendarEncoder: Send + Sync {
    /// イベントをエンコードする
    ///
    /// 入力の検証に失敗した場合は `CalendarError` を返す。
    fn encode(&self, event: &CalendarEvent) -> Result<Vec<u8>, CalendarError>;
}

/// icalendar クレートによる実装
#[derive(Debug, Clone, Default)]
pub struct IcsCalendarEncoder;

impl IcsCalendarEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl CalendarEncoder for IcsCalendarEncoder {
    fn encode(&self, event: &CalendarEvent) -> Result<Vec<u8>, CalendarError> {
        event.validate()?;

        let organizer = Property::new(
            "ORGANIZER",
            &format!("mailto:{}", event.organizer.email),
        )
        .add_parameter("CN", &param_value(&event.organizer.name))
        .done();

        let mut ical_event = Event::new();
        ical_event
            .summary(&event.title)
            .description(&event.description)
            .starts(CalendarDateTime::Floating(event.start.to_naive()))
            .ends(CalendarDateTime::Floating(event.end.to_naive()))
            .location(&event.location)
            .status(to_ical_status(event.status))
            .append_property(organizer);

        for alarm in &event.alarms {
            let trigger = -Duration::minutes(i64::from(alarm.minutes_before));
            let ical_alarm = match alarm.action {
                AlarmAction::Display => Alarm::display(&event.title, trigger),
            };
            ical_event.alarm(ical_alarm);
        }

        let mut calendar = Calendar::new();
        calendar.push(ical_event.done());

        Ok(calendar.to_string().into_bytes())
    }
}

/// パラメータ値として安全な文字列にする
///
/// icalendar クレートは値をそのまま `"` で囲むため、値に含まれる `"` は `'` に置き換え、
/// 制御文字は取り除く（RFC 5545 の quoted-string はどちらも許さない）。
fn param_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' { '\'' } else { c })
        .collect()
}

fn to_ical_status(status: EventStatus) -> IcalEventStatus {
    match status {
        EventStatus::Tentative => IcalEventStatus::Tentative,
        EventStatus::Confirmed => IcalEventStatus::Confirmed,
        EventStatus::Cancelled => IcalEventStatus::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use agenda_domain::calendar::{CalendarFields, Organizer, ReminderAlarm};

    use super::*;

    fn make_event(start_minute: u32, end_minute: u32) -> CalendarEvent {
        CalendarEvent {
            title:       "Corte con Luis - Salon X".to_string(),
            description: "Reserva en Salon X\nCliente: Ana\nProfesional: Luis".to_string(),
            start:       CalendarFields::new(2024, 5, 1, 10, start_minute).unwrap(),
            end:         CalendarFields::new(2024, 5, 1, 10, end_minute).unwrap(),
            location:    "Calle 1".to_string(),
            status:      EventStatus::Confirmed,
            organizer:   Organizer {
                name:  "Salon X".to_string(),
                email: "owner@x.com".to_string(),
            },
            alarms:      vec![ReminderAlarm::display_before(30)],
        }
    }

    fn encode_to_string(event: &CalendarEvent) -> String {
        let bytes = IcsCalendarEncoder::new().encode(event).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn 正常なイベントをvcalendarにエンコードする() {
        let ics = encode_to_string(&make_event(0, 30));

        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("SUMMARY:Corte con Luis - Salon X"));
        assert!(ics.contains("DTSTART:20240501T100000"));
        assert!(ics.contains("DTEND:20240501T103000"));
        assert!(ics.contains("STATUS:CONFIRMED"));
        assert!(ics.contains("LOCATION:Calle 1"));
        assert!(ics.contains("END:VCALENDAR"));
    }

    #[test]
    fn 主催者とリマインダーが含まれる() {
        let ics = encode_to_string(&make_event(0, 30));

        let organizer_line = ics
            .lines()
            .find(|line| line.starts_with("ORGANIZER"))
            .unwrap();
        assert!(organizer_line.contains("CN="));
        assert!(organizer_line.contains("Salon X"));
        assert!(organizer_line.ends_with("mailto:owner@x.com"));
        assert!(ics.contains("BEGIN:VALARM"));
        assert!(ics.contains("ACTION:DISPLAY"));
        assert!(ics.contains("TRIGGER"));
    }

    #[test]
    fn 主催者名の二重引用符は置き換えて出力する() {
        let mut event = make_event(0, 30);
        event.organizer.name = "Salon \"X\"; Co\r\n".to_string();

        let ics = encode_to_string(&event);

        let organizer_line = ics
            .lines()
            .find(|line| line.starts_with("ORGANIZER"))
            .unwrap();
        let (params, value) = organizer_line.rsplit_once("\":").unwrap();
        assert_eq!(value, "mailto:owner@x.com");
        assert_eq!(params.matches('"').count(), 1);
        assert!(params.contains("Salon 'X'; Co"));
    }

    #[test]
    fn 開始と終了が逆転していればエラーを返す() {
        let result = IcsCalendarEncoder::new().encode(&make_event(30, 0));

        assert!(matches!(result, Err(CalendarError::NonMonotonic { .. })));
    }

    #[test]
    fn 開始と終了が同時刻ならエラーを返す() {
        let result = IcsCalendarEncoder::new().encode(&make_event(0, 0));

        assert!(result.is_err());
    }
}
