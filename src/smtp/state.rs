use std::time::{Duration, Instant};

use tracing::debug;

use super::error::ProbeError;
use super::session::{SmtpSession, Transport};
use super::types::{ProbeSignal, ProbeStage};
use super::util::LocalPartGenerator;

type Connector<'a, S> = dyn Fn() -> Result<S, ProbeError> + 'a;

/// Everything a probe needs besides the connection itself.
pub(crate) struct ProbeContext<'a, S> {
    pub connect: &'a Connector<'a, S>,
    pub handshake_deadline: Option<Duration>,
    pub helo_name: &'a str,
    pub mail_from: &'a str,
    pub target: &'a str,
    pub domain: &'a str,
    pub local_parts: &'a dyn LocalPartGenerator,
}

/// Handshake progress. Each variant that holds a session owns the single
/// connection of this probe.
pub(crate) enum ProbeState<S> {
    Disconnected,
    Connected(SmtpSession<S>),
    Greeted(SmtpSession<S>),
    Helloed(SmtpSession<S>),
    SenderSet(SmtpSession<S>),
    Done(ProbeSignal),
}

impl<S: Transport> ProbeState<S> {
    pub(crate) fn step(self, ctx: &ProbeContext<'_, S>) -> Self {
        match self {
            Self::Disconnected => on_disconnected(ctx),
            Self::Connected(session) => on_connected(session),
            Self::Greeted(session) => on_greeted(session, ctx),
            Self::Helloed(session) => on_helloed(session, ctx),
            Self::SenderSet(session) => on_sender_set(session, ctx),
            done @ Self::Done(_) => done,
        }
    }

    /// Steps until a signal is produced.
    pub(crate) fn run(self, ctx: &ProbeContext<'_, S>) -> ProbeSignal {
        let mut state = self;
        loop {
            match state {
                Self::Done(signal) => return signal,
                other => state = other.step(ctx),
            }
        }
    }
}

fn abort<S>(stage: ProbeStage, err: &ProbeError) -> ProbeState<S> {
    debug!(%stage, error = %err, "SMTP probe inconclusive");
    ProbeState::Done(ProbeSignal::INCONCLUSIVE)
}

fn unexpected(stage: ProbeStage, code: u16) -> ProbeError {
    ProbeError::Protocol(format!("unexpected {stage} reply {code}"))
}

fn on_disconnected<S: Transport>(ctx: &ProbeContext<'_, S>) -> ProbeState<S> {
    match (ctx.connect)() {
        Ok(stream) => {
            let deadline = ctx.handshake_deadline.map(|budget| Instant::now() + budget);
            ProbeState::Connected(SmtpSession::new(stream, deadline))
        }
        Err(err) => abort(ProbeStage::Connect, &err),
    }
}

fn on_connected<S: Transport>(mut session: SmtpSession<S>) -> ProbeState<S> {
    match session.read_reply() {
        Ok(reply) if reply.is_positive_completion() => ProbeState::Greeted(session),
        Ok(reply) => abort(
            ProbeStage::Greeting,
            &unexpected(ProbeStage::Greeting, reply.code),
        ),
        Err(err) => abort(ProbeStage::Greeting, &err),
    }
}

fn on_greeted<S: Transport>(
    mut session: SmtpSession<S>,
    ctx: &ProbeContext<'_, S>,
) -> ProbeState<S> {
    match session.command(&format!("EHLO {}", ctx.helo_name)) {
        Ok(reply) if reply.is_positive_completion() => return ProbeState::Helloed(session),
        Ok(reply) => debug!(code = reply.code, "EHLO refused, falling back to HELO"),
        Err(err) => debug!(error = %err, "EHLO failed, falling back to HELO"),
    }
    match session.command(&format!("HELO {}", ctx.helo_name)) {
        Ok(reply) if reply.is_positive_completion() => ProbeState::Helloed(session),
        Ok(reply) => abort(ProbeStage::Hello, &unexpected(ProbeStage::Hello, reply.code)),
        Err(err) => abort(ProbeStage::Hello, &err),
    }
}

fn on_helloed<S: Transport>(
    mut session: SmtpSession<S>,
    ctx: &ProbeContext<'_, S>,
) -> ProbeState<S> {
    match session.command(&format!("MAIL FROM:<{}>", ctx.mail_from)) {
        Ok(reply) if reply.is_positive_completion() => ProbeState::SenderSet(session),
        Ok(reply) => abort(
            ProbeStage::MailFrom,
            &unexpected(ProbeStage::MailFrom, reply.code),
        ),
        Err(err) => abort(ProbeStage::MailFrom, &err),
    }
}

fn on_sender_set<S: Transport>(
    mut session: SmtpSession<S>,
    ctx: &ProbeContext<'_, S>,
) -> ProbeState<S> {
    let reply = match session.command(&format!("RCPT TO:<{}>", ctx.target)) {
        Ok(reply) => reply,
        Err(err) => return abort(ProbeStage::RcptTo, &err),
    };
    match reply.code {
        250 => ProbeState::Done(check_catch_all(&mut session, ctx)),
        code if reply.is_permanent_failure() => {
            debug!(code, "recipient rejected");
            ProbeState::Done(ProbeSignal::REJECTED)
        }
        code => abort(ProbeStage::RcptTo, &unexpected(ProbeStage::RcptTo, code)),
    }
}

/// Second `RCPT TO` on the same connection with a made-up local part.
fn check_catch_all<S: Transport>(
    session: &mut SmtpSession<S>,
    ctx: &ProbeContext<'_, S>,
) -> ProbeSignal {
    let local = ctx.local_parts.generate();
    match session.command(&format!("RCPT TO:<{local}@{}>", ctx.domain)) {
        Ok(reply) if reply.code == 250 => ProbeSignal::CATCH_ALL,
        Ok(_) => ProbeSignal::ACCEPTED,
        Err(err) => {
            debug!(stage = %ProbeStage::CatchAll, error = %err, "catch-all check failed");
            ProbeSignal::ACCEPTED
        }
    }
}
