//! # メール組み立て
//!
//! クライアント宛ての確認メールとオーナー宛ての新規予約通知を組み立てる。
//! 送信者は両方とも `"{テナント表示名}" <システムの送信元アドレス>`。

use agenda_domain::{
    appointment::Appointment,
    notification::{EmailAttachment, EmailMessage, SenderIdentity},
    tenant::TenantPresentation,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// 開始日時の表示形式（`dd/mm/yyyy, HH:MM`）
const START_FORMAT: &str = "%d/%m/%Y, %H:%M";

pub struct MessageComposer {
    system_address: String,
    timezone:       Tz,
}

impl MessageComposer {
    pub fn new(system_address: impl Into<String>, timezone: Tz) -> Self {
        Self {
            system_address: system_address.into(),
            timezone,
        }
    }

    /// クライアント宛ての確認メール
    pub fn client_message(
        &self,
        appointment: &Appointment,
        tenant: &TenantPresentation,
        attachment: Option<&EmailAttachment>,
    ) -> EmailMessage {
        EmailMessage {
            from:        self.sender(tenant),
            to:          appointment.client_email.clone(),
            subject:     format!("Tu cita en {} está confirmada", tenant.display_name),
            text_body:   format!(
                "Hola {},\nTu cita para {} con {} fue agendada para el {}.",
                appointment.client_name,
                appointment.service_name,
                appointment.staff_name,
                self.format_start(appointment.start)
            ),
            attachments: attachment.cloned().into_iter().collect(),
        }
    }

    /// オーナー宛ての新規予約通知
    pub fn owner_message(
        &self,
        appointment: &Appointment,
        tenant: &TenantPresentation,
        attachment: Option<&EmailAttachment>,
    ) -> EmailMessage {
        EmailMessage {
            from:        self.sender(tenant),
            to:          tenant.owner_email.clone(),
            subject:     format!("Nueva cita agendada - {}", appointment.service_name),
            text_body:   format!(
                "Cliente: {} ({})\nProfesional: {}\nFecha: {}",
                appointment.client_name,
                appointment.client_email,
                appointment.staff_name,
                self.format_start(appointment.start)
            ),
            attachments: attachment.cloned().into_iter().collect(),
        }
    }

    fn sender(&self, tenant: &TenantPresentation) -> SenderIdentity {
        SenderIdentity {
            name:    tenant.display_name.clone(),
            address: self.system_address.clone(),
        }
    }

    fn format_start(&self, start: DateTime<Utc>) -> String {
        start
            .with_timezone(&self.timezone)
            .format(START_FORMAT)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    const SYSTEM_ADDRESS: &str = "reservas@agenda.example.com";

    fn make_appointment() -> Appointment {
        Appointment::new(
            Some("Ana".to_string()),
            "ana@x.com".to_string(),
            Some("Luis".to_string()),
            Some("Corte".to_string()),
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap(),
        )
        .unwrap()
    }

    fn make_tenant() -> TenantPresentation {
        TenantPresentation {
            display_name: "Salon X".to_string(),
            owner_email:  "owner@x.com".to_string(),
            address:      String::new(),
        }
    }

    #[test]
    fn クライアント宛ての確認メールを組み立てる() {
        let composer = MessageComposer::new(SYSTEM_ADDRESS, Tz::UTC);
        let attachment = EmailAttachment::calendar(b"BEGIN:VCALENDAR".to_vec());

        let email = composer.client_message(&make_appointment(), &make_tenant(), Some(&attachment));

        assert_eq!(email.to, "ana@x.com");
        assert_eq!(email.from, SenderIdentity {
            name:    "Salon X".to_string(),
            address: SYSTEM_ADDRESS.to_string(),
        });
        assert_eq!(email.subject, "Tu cita en Salon X está confirmada");
        assert_eq!(
            email.text_body,
            "Hola Ana,\nTu cita para Corte con Luis fue agendada para el 01/05/2024, 10:00."
        );
        assert_eq!(email.attachments, vec![attachment]);
    }

    #[test]
    fn オーナー宛ての通知メールを組み立てる() {
        let composer = MessageComposer::new(SYSTEM_ADDRESS, Tz::UTC);

        let email = composer.owner_message(&make_appointment(), &make_tenant(), None);

        assert_eq!(email.to, "owner@x.com");
        assert_eq!(email.subject, "Nueva cita agendada - Corte");
        assert_eq!(
            email.text_body,
            "Cliente: Ana (ana@x.com)\nProfesional: Luis\nFecha: 01/05/2024, 10:00"
        );
        assert!(email.attachments.is_empty());
    }

    #[test]
    fn 開始日時は設定したタイムゾーンで表示する() {
        let composer = MessageComposer::new(SYSTEM_ADDRESS, chrono_tz::America::Santiago);

        let email = composer.owner_message(&make_appointment(), &make_tenant(), None);

        assert!(email.text_body.ends_with("Fecha: 01/05/2024, 06:00"));
    }
}
