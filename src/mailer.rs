use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::MailConfig;

/// A plain-text message ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from_name: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()>;
}

/// Sends through an authenticated SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .with_context(|| format!("smtp relay {}", cfg.smtp_host))?
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();
        Ok(Self {
            transport,
            sender: cfg.username.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        let from: Mailbox = format!("\"{}\" <{}>", mail.from_name, self.sender)
            .parse()
            .context("parse sender")?;
        let to: Mailbox = mail.to.parse().context("parse recipient")?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN);
        if let Some(reply_to) = mail.reply_to {
            builder = builder.reply_to(reply_to.parse().context("parse reply-to")?);
        }
        let message = builder.body(mail.body).context("build message")?;

        self.transport.send(message).await.context("smtp send")?;
        Ok(())
    }
}

/// Picks the mailer for a running server: SMTP when configured, otherwise
/// one that refuses every send.
pub fn from_config(mail: Option<&MailConfig>) -> anyhow::Result<Arc<dyn Mailer>> {
    match mail {
        Some(cfg) => {
            info!(smtp_host = %cfg.smtp_host, "smtp mailer configured");
            Ok(Arc::new(SmtpMailer::new(cfg)?))
        }
        None => {
            warn!("EMAIL_USER/EMAIL_PASS not set; contact mail will fail");
            Ok(Arc::new(UnconfiguredMailer))
        }
    }
}

/// Stands in for SMTP when no credentials were given. Every send fails.
#[derive(Clone, Default)]
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        anyhow::bail!("smtp not configured; cannot send to {}", mail.to)
    }
}

/// Writes mail to the log instead of sending it. Only for in-memory setups.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        info!(
            to = %mail.to,
            reply_to = ?mail.reply_to,
            subject = %mail.subject,
            "mail logged only"
        );
        Ok(())
    }
}
