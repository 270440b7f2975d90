use super::env::{EnvLookup, read_non_empty, read_u16, split_list};

pub(super) const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub(super) const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub(super) const ENV_SMTP_USER: &str = "SMTP_USER";
pub(super) const ENV_SMTP_PASS: &str = "SMTP_PASS";
pub(super) const ENV_MAIL_FROM: &str = "MAIL_FROM";
pub(super) const ENV_MAIL_TO: &str = "MAIL_TO";
pub(super) const ENV_MAIL_SUBJECT: &str = "MAIL_SUBJECT";

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SUBJECT: &str = "Funding & Tariff Radar – Weekly Digest";

/// Raw mail settings as configured; any of them may be missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MailConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub to: Vec<String>,
    pub subject: String,
}

/// Mail settings with every field required for delivery present.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
}

impl MailConfig {
    pub(super) fn from_lookup(lookup: &dyn EnvLookup) -> Self {
        Self {
            host: read_non_empty(lookup, ENV_SMTP_HOST),
            port: read_u16(lookup, ENV_SMTP_PORT).unwrap_or(DEFAULT_SMTP_PORT),
            user: read_non_empty(lookup, ENV_SMTP_USER),
            password: read_non_empty(lookup, ENV_SMTP_PASS),
            from: read_non_empty(lookup, ENV_MAIL_FROM),
            to: read_non_empty(lookup, ENV_MAIL_TO)
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            subject: read_non_empty(lookup, ENV_MAIL_SUBJECT)
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        }
    }

    /// Names of the settings that keep delivery from being possible.
    #[must_use]
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.is_none() {
            missing.push(ENV_SMTP_HOST);
        }
        if self.user.is_none() {
            missing.push(ENV_SMTP_USER);
        }
        if self.password.is_none() {
            missing.push(ENV_SMTP_PASS);
        }
        if self.from.is_none() {
            missing.push(ENV_MAIL_FROM);
        }
        if self.to.is_empty() {
            missing.push(ENV_MAIL_TO);
        }
        missing
    }

    #[must_use]
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        if self.to.is_empty() {
            return None;
        }
        Some(SmtpSettings {
            host: self.host.clone()?,
            port: self.port,
            user: self.user.clone()?,
            password: self.password.clone()?,
            from: self.from.clone()?,
            to: self.to.clone(),
            subject: self.subject.clone(),
        })
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .finish()
    }
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}
