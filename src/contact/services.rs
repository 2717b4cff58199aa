use std::sync::Arc;

use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, instrument};

use crate::{
    auth::services::required,
    error::AppError,
    mailer::{Mailer, OutgoingMail},
};

const BRAND: &str = "Cloud SaaS";

/// Relays contact-form submissions to the site admin and confirms to the sender.
#[derive(Clone)]
pub struct ContactService {
    mailer: Arc<dyn Mailer>,
    admin_email: String,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn Mailer>, admin_email: impl Into<String>) -> Self {
        Self {
            mailer,
            admin_email: admin_email.into(),
        }
    }

    #[instrument(skip_all, fields(from = %email.trim()))]
    pub async fn submit(&self, name: &str, email: &str, query: &str) -> Result<(), AppError> {
        let name = required(name)?;
        let email = required(email)?;
        let query = required(query)?;

        let received_at = OffsetDateTime::now_utc();
        self.mailer
            .send(admin_notification(&self.admin_email, name, email, query, received_at))
            .await
            .map_err(AppError::Delivery)?;
        self.mailer
            .send(user_confirmation(name, email, query))
            .await
            .map_err(AppError::Delivery)?;

        info!("contact message relayed");
        Ok(())
    }
}

fn admin_notification(
    admin: &str,
    name: &str,
    email: &str,
    query: &str,
    received_at: OffsetDateTime,
) -> OutgoingMail {
    let received = received_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| received_at.unix_timestamp().to_string());
    OutgoingMail {
        from_name: BRAND.into(),
        to: admin.into(),
        reply_to: Some(email.into()),
        subject: format!("New Contact Message - {BRAND}"),
        body: format!(
            "New contact inquiry\n\nName: {name}\nEmail: {email}\n\nMessage:\n{query}\n\nReceived on {received}\n"
        ),
    }
}

fn user_confirmation(name: &str, email: &str, query: &str) -> OutgoingMail {
    OutgoingMail {
        from_name: format!("{BRAND} Support"),
        to: email.into(),
        reply_to: None,
        subject: format!("We Received Your Message - {BRAND}"),
        body: format!(
            "Hi {name},\n\nThank you for reaching out to us.\nWe've received your message and our team will respond within 24 hours.\n\nYour message:\n{query}\n\nBest regards,\n{BRAND} Team\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Outbox(Mutex<Vec<OutgoingMail>>);

    #[async_trait]
    impl Mailer for Outbox {
        async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
            self.0.lock().await.push(mail);
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Mailer for Broken {
        async fn send(&self, _mail: OutgoingMail) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn sends_admin_then_user_mail() {
        let outbox = Arc::new(Outbox::default());
        let svc = ContactService::new(outbox.clone(), "admin@cloud.test");
        svc.submit("Grace", "grace@x.com", "Do you do SSO?").await.unwrap();

        let sent = outbox.0.lock().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "admin@cloud.test");
        assert_eq!(sent[0].reply_to.as_deref(), Some("grace@x.com"));
        assert!(sent[0].body.contains("Do you do SSO?"));
        assert_eq!(sent[1].to, "grace@x.com");
        assert!(sent[1].reply_to.is_none());
        assert!(sent[1].body.starts_with("Hi Grace,"));
    }

    #[tokio::test]
    async fn empty_field_sends_nothing() {
        let outbox = Arc::new(Outbox::default());
        let svc = ContactService::new(outbox.clone(), "admin@cloud.test");
        let err = svc.submit("Grace", "grace@x.com", "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(outbox.0.lock().await.is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_surfaces() {
        let svc = ContactService::new(Arc::new(Broken), "admin@cloud.test");
        let err = svc.submit("Grace", "grace@x.com", "hello").await.unwrap_err();
        assert!(matches!(err, AppError::Delivery(_)));
        assert_eq!(err.to_string(), "Email sending failed");
    }

    #[test]
    fn admin_mail_stamps_receipt_time() {
        let at = time::macros::datetime!(2024-05-01 12:30:00 UTC);
        let mail = admin_notification("admin@cloud.test", "Grace", "g@x.com", "hi", at);
        assert!(mail.body.contains("Received on 2024-05-01T12:30:00Z"));
        assert_eq!(mail.subject, "New Contact Message - Cloud SaaS");
    }
}
