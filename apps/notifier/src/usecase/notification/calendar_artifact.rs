//! # カレンダー招待の生成
//!
//! 予約とテナント情報から [`CalendarEvent`] を組み立て、エンコードして添付にする。
//! 失敗しても処理は止めず、添付なしで続行する。

use std::sync::Arc;

use agenda_domain::{
    appointment::Appointment,
    calendar::{
        CalendarEvent,
        CalendarFields,
        DEFAULT_REMINDER_MINUTES,
        EventStatus,
        Organizer,
        ReminderAlarm,
    },
    notification::EmailAttachment,
    tenant::TenantPresentation,
};
use agenda_infra::calendar::CalendarEncoder;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::report::AttachmentOutcome;

pub struct CalendarArtifactBuilder {
    encoder:  Arc<dyn CalendarEncoder>,
    /// 絶対時刻をローカル日時に変換するタイムゾーン
    timezone: Tz,
}

impl CalendarArtifactBuilder {
    pub fn new(encoder: Arc<dyn CalendarEncoder>, timezone: Tz) -> Self {
        Self { encoder, timezone }
    }

    /// 添付を生成する
    ///
    /// 失敗時は `None` と劣化理由を返す。
    pub fn build(
        &self,
        appointment: &Appointment,
        tenant: &TenantPresentation,
    ) -> (Option<EmailAttachment>, AttachmentOutcome) {
        let event = self.build_event(appointment, tenant);

        match self.encoder.encode(&event) {
            Ok(content) => (
                Some(EmailAttachment::calendar(content)),
                AttachmentOutcome::Attached,
            ),
            Err(e) => (None, AttachmentOutcome::Degraded {
                reason: e.to_string(),
            }),
        }
    }

    /// 予約からカレンダーイベントを組み立てる
    ///
    /// 開始・終了の前後関係はここでは検証しない（エンコーダが検証する）。
    pub fn build_event(
        &self,
        appointment: &Appointment,
        tenant: &TenantPresentation,
    ) -> CalendarEvent {
        CalendarEvent {
            title:       format!(
                "{} con {} - {}",
                appointment.service_name, appointment.staff_name, tenant.display_name
            ),
            description: format!(
                "Reserva en {}\nCliente: {}\nProfesional: {}",
                tenant.display_name, appointment.client_name, appointment.staff_name
            ),
            start:       self.local_fields(appointment.start),
            end:         self.local_fields(appointment.end),
            location:    tenant.address.clone(),
            status:      EventStatus::Confirmed,
            organizer:   Organizer {
                name:  tenant.display_name.clone(),
                email: tenant.owner_email.clone(),
            },
            alarms:      vec![ReminderAlarm::display_before(DEFAULT_REMINDER_MINUTES)],
        }
    }

    fn local_fields(&self, instant: DateTime<Utc>) -> CalendarFields {
        CalendarFields::from_naive(instant.with_timezone(&self.timezone).naive_local())
    }
}

#[cfg(test)]
mod tests {
    use agenda_domain::calendar::CALENDAR_FILENAME;
    use agenda_infra::{calendar::IcsCalendarEncoder, mock::FailingCalendarEncoder};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_appointment(start_hour: u32, end_hour: u32) -> Appointment {
        Appointment::new(
            Some("Ana".to_string()),
            "ana@x.com".to_string(),
            Some("Luis".to_string()),
            Some("Corte".to_string()),
            Utc.with_ymd_and_hms(2024, 5, 1, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, end_hour, 30, 0).unwrap(),
        )
        .unwrap()
    }

    fn make_tenant() -> TenantPresentation {
        TenantPresentation {
            display_name: "Salon X".to_string(),
            owner_email:  "owner@x.com".to_string(),
            address:      "Calle 1".to_string(),
        }
    }

    fn builder(timezone: Tz) -> CalendarArtifactBuilder {
        CalendarArtifactBuilder::new(Arc::new(IcsCalendarEncoder::new()), timezone)
    }

    #[test]
    fn 予約からイベントを組み立てる() {
        let event = builder(Tz::UTC).build_event(&make_appointment(10, 10), &make_tenant());

        assert_eq!(event.title, "Corte con Luis - Salon X");
        assert_eq!(
            event.description,
            "Reserva en Salon X\nCliente: Ana\nProfesional: Luis"
        );
        assert_eq!(event.start, CalendarFields::new(2024, 5, 1, 10, 0).unwrap());
        assert_eq!(event.end, CalendarFields::new(2024, 5, 1, 10, 30).unwrap());
        assert_eq!(event.location, "Calle 1");
        assert_eq!(event.status, EventStatus::Confirmed);
        assert_eq!(event.organizer.email, "owner@x.com");
        assert_eq!(event.alarms, vec![ReminderAlarm::display_before(30)]);
    }

    #[test]
    fn 設定したタイムゾーンのローカル日時に変換する() {
        let event = builder(chrono_tz::America::Santiago)
            .build_event(&make_appointment(14, 14), &make_tenant());

        // 2024-05-01 のサンティアゴは UTC-4
        assert_eq!(event.start, CalendarFields::new(2024, 5, 1, 10, 0).unwrap());
    }

    #[test]
    fn 生成に成功すれば添付になる() {
        let (attachment, outcome) = builder(Tz::UTC).build(&make_appointment(10, 10), &make_tenant());

        assert_eq!(outcome, AttachmentOutcome::Attached);
        let attachment = attachment.unwrap();
        assert_eq!(attachment.filename, CALENDAR_FILENAME);
        assert!(!attachment.content.is_empty());
    }

    #[test]
    fn 開始と終了が逆転していれば添付なしで劣化する() {
        let (attachment, outcome) = builder(Tz::UTC).build(&make_appointment(11, 10), &make_tenant());

        assert!(attachment.is_none());
        assert!(matches!(outcome, AttachmentOutcome::Degraded { .. }));
    }

    #[test]
    fn エンコーダの失敗は劣化として扱う() {
        let builder = CalendarArtifactBuilder::new(Arc::new(FailingCalendarEncoder), Tz::UTC);

        let (attachment, outcome) = builder.build(&make_appointment(10, 10), &make_tenant());

        assert!(attachment.is_none());
        assert!(matches!(outcome, AttachmentOutcome::Degraded { .. }));
    }
}
