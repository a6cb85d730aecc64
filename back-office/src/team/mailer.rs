//! Outgoing email seam

use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

use crate::error::BoxError;

/// Invitation email contents
#[derive(Debug, Clone)]
pub struct InvitationEmail<'a> {
    pub to: &'a str,
    pub role: &'a str,
    pub accept_url: &'a str,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_invitation(&self, email: &InvitationEmail<'_>) -> Result<(), BoxError>;
}

/// AWS SES sender
pub struct SesMailer {
    ses: SesClient,
    from: String,
}

impl SesMailer {
    pub fn new(ses: SesClient, from: String) -> Self {
        Self { ses, from }
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send_invitation(&self, email: &InvitationEmail<'_>) -> Result<(), BoxError> {
        let subject = Content::builder()
            .data("Invitación al equipo / Team invitation")
            .build()?;

        let body_text = format!(
            "Te han invitado a unirte al equipo como {role}.\n\
             Acepta la invitación aquí: {url}\n\
             El enlace caduca en 7 días.\n\n\
             You have been invited to join the team as {role}.\n\
             Accept the invitation here: {url}\n\
             The link expires in 7 days.",
            role = email.role,
            url = email.accept_url,
        );

        let body = Body::builder()
            .text(Content::builder().data(body_text).build()?)
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(email.to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;

        tracing::info!(to = email.to, "Team invitation sent");
        Ok(())
    }
}

/// Development sender: logs the link instead of emailing it
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_invitation(&self, email: &InvitationEmail<'_>) -> Result<(), BoxError> {
        tracing::info!(
            to = email.to,
            role = email.role,
            accept_url = email.accept_url,
            "Team invitation (not sent, no SES sender configured)"
        );
        Ok(())
    }
}
