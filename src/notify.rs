use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::config::TelegramConfig;
use crate::db::Booking;

/// Pushes new booking requests to the admin's Telegram chat.
///
/// Notification is best-effort by design: it runs on its own task after
/// the booking transaction has committed, and a delivery failure is only
/// logged, never reported to the visitor.
#[derive(Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    bot_token: SecretString,
    chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id,
        }
    }

    /// Fire-and-forget push for a freshly created booking.
    pub fn notify_created(&self, booking: &Booking) {
        let notifier = self.clone();
        let text = render_created(booking);
        let booking_id = booking.id;
        tokio::spawn(async move {
            match notifier.send(&text).await {
                Ok(()) => debug!(booking_id, "telegram notification sent"),
                Err(err) => warn!(booking_id, error = %err, "telegram notification failed"),
            }
        });
    }

    async fn send(&self, text: &str) -> Result<(), reqwest::Error> {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.bot_token.expose_secret()
        );
        self.http
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn render_created(booking: &Booking) -> String {
    let mut text = format!(
        "🌿 Новая заявка №{}\n\n\
         👤 {}\n\
         📞 {}\n\
         ✉️ {}\n\
         🏷 {}\n\
         📅 {} {}–{}\n\
         🌐 {}",
        booking.id,
        booking.name,
        booking.phone,
        booking.email,
        booking.resource_type,
        booking.booking_date,
        booking.start_time,
        booking.end_time,
        booking.language.name(),
    );
    if let Some(message) = &booking.message {
        text.push_str("\n💬 ");
        text.push_str(message);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::ResourceType;
    use crate::i18n::SupportedLanguage;
    use chrono::NaiveDate;

    fn booking() -> Booking {
        Booking {
            id: 7,
            name: "Maria".into(),
            email: "maria@example.com".into(),
            phone: "+37360123456".into(),
            booking_date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            start_time: "10:00".into(),
            end_time: "14:00".into(),
            resource_type: ResourceType::Sauna,
            language: SupportedLanguage::Romanian,
            message: Some("день рождения".into()),
            confirmed: false,
            created_at: NaiveDate::from_ymd_opt(2026, 8, 6)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2026, 8, 6)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn rendered_text_carries_the_slot_and_contacts() {
        let text = render_created(&booking());
        assert!(text.contains("№7"));
        assert!(text.contains("Maria"));
        assert!(text.contains("+37360123456"));
        assert!(text.contains("sauna"));
        assert!(text.contains("2026-08-20"));
        assert!(text.contains("10:00–14:00"));
        assert!(text.contains("Română"));
        assert!(text.contains("день рождения"));
    }

    #[test]
    fn message_line_is_optional() {
        let mut b = booking();
        b.message = None;
        assert!(!render_created(&b).contains("💬"));
    }
}
