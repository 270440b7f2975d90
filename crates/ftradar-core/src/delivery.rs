use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{DigestConfig, MailConfig, SmtpSettings};
use crate::digest::{RenderedDigest, render_digest};
use crate::error::Result;
use crate::state::{ItemQuery, ItemStore};

/// Outbound channel for the rendered HTML digest.
pub trait DigestMailer {
    fn send(&self, settings: &SmtpSettings, html: &str) -> Result<()>;
}

/// SMTP delivery with STARTTLS and login credentials.
#[cfg(feature = "mail")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

#[cfg(feature = "mail")]
impl DigestMailer for SmtpMailer {
    fn send(&self, settings: &SmtpSettings, html: &str) -> Result<()> {
        use lettre::message::{Mailbox, header::ContentType};
        use lettre::transport::smtp::authentication::Credentials;
        use lettre::{Message, SmtpTransport, Transport};

        use crate::error::RadarError;

        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|err| RadarError::Mail(format!("invalid sender {}: {err}", settings.from)))?;
        let mut builder = Message::builder()
            .from(from)
            .subject(settings.subject.as_str())
            .header(ContentType::TEXT_HTML);
        for recipient in &settings.to {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|err| RadarError::Mail(format!("invalid recipient {recipient}: {err}")))?;
            builder = builder.to(mailbox);
        }
        let message = builder
            .body(html.to_string())
            .map_err(|err| RadarError::Mail(err.to_string()))?;

        let transport = SmtpTransport::starttls_relay(&settings.host)
            .map_err(|err| RadarError::Mail(err.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .build();
        transport
            .send(&message)
            .map_err(|err| RadarError::Mail(err.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MailOutcome {
    Sent { recipients: usize },
    Skipped { missing: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestReport {
    pub days: u32,
    pub item_count: usize,
    pub markdown_path: PathBuf,
    pub html_path: PathBuf,
    pub mail: MailOutcome,
}

/// Writes both digest artifacts, creating parent directories as needed.
pub fn write_artifacts(digest: &RenderedDigest, markdown_path: &Path, html_path: &Path) -> Result<()> {
    for (path, content) in [(markdown_path, &digest.markdown), (html_path, &digest.html)] {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
    }
    Ok(())
}

/// Sends the HTML digest when mail settings are complete; otherwise logs and skips.
pub fn deliver_mail(mail: &MailConfig, mailer: &dyn DigestMailer, html: &str) -> Result<MailOutcome> {
    let Some(settings) = mail.smtp_settings() else {
        let missing = mail.missing_settings();
        tracing::info!(missing = ?missing, "mail delivery skipped: SMTP settings incomplete");
        return Ok(MailOutcome::Skipped {
            missing: missing.into_iter().map(ToString::to_string).collect(),
        });
    };
    mailer.send(&settings, html)?;
    tracing::info!(recipients = settings.to.len(), "digest mailed");
    Ok(MailOutcome::Sent {
        recipients: settings.to.len(),
    })
}

/// Query, render, write and optionally mail the digest for the configured window.
pub fn publish_digest(
    store: &ItemStore,
    digest: &DigestConfig,
    mail: Option<(&MailConfig, &dyn DigestMailer)>,
    now: DateTime<Utc>,
) -> Result<DigestReport> {
    let items = store.query(&ItemQuery::last_days(digest.days)?.at(now))?;
    let rendered = render_digest(&items, digest.days);
    write_artifacts(&rendered, &digest.markdown_path, &digest.html_path)?;
    tracing::info!(
        items = items.len(),
        markdown = %digest.markdown_path.display(),
        html = %digest.html_path.display(),
        "digest written"
    );

    let mail = match mail {
        Some((config, mailer)) => deliver_mail(config, mailer, &rendered.html)?,
        None => MailOutcome::Skipped {
            missing: Vec::new(),
        },
    };

    Ok(DigestReport {
        days: digest.days,
        item_count: items.len(),
        markdown_path: digest.markdown_path.clone(),
        html_path: digest.html_path.clone(),
        mail,
    })
}
