//! Confirmation-gated removal of instance data
//!
//! The destructive call only goes out after the operator either passed
//! `--auto-confirm` or typed the confirmation phrase exactly. A 404 from the
//! instance means the server does not offer data cleaning; every other
//! failure is returned to the caller untouched.

use anyhow::Result;

use crate::constants::CONFIRMATION_PHRASE;
use crate::gateway::Gateway;
use crate::prompt::Prompter;

/// How a clean request ended, short of an unexpected failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// The instance accepted the clean request.
    Cleaned,
    /// The instance answered 404: data clean is not available there.
    Unsupported,
    /// The operator did not type the confirmation phrase. Nothing was sent.
    Rejected,
}

/// Exact, case-sensitive comparison against [`CONFIRMATION_PHRASE`].
pub fn is_confirmed(answer: &str) -> bool {
    answer == CONFIRMATION_PHRASE
}

/// Warn, obtain confirmation, and clean the instance behind `gateway`.
///
/// # Errors
/// Returns the gateway error for any failure other than a 404, and any I/O
/// error raised while prompting.
pub async fn confirm_cleanup<G, P>(
    gateway: &G,
    auto_confirm: bool,
    prompter: &mut P,
) -> Result<CleanOutcome>
where
    G: Gateway + ?Sized,
    P: Prompter + ?Sized,
{
    eprintln!();
    eprintln!(
        "⚠️  WARNING!!! You are going to REMOVE your data from instance: {}",
        gateway.url()
    );
    eprintln!("⚠️  There is no coming back.");
    eprintln!();

    let confirmed = auto_confirm
        || is_confirmed(&prompter.line(&format!(
            "If you still want to continue please type: '{CONFIRMATION_PHRASE}' "
        ))?);

    if !confirmed {
        eprintln!("❌ Wrong confirmation. Closed without cleaning instance data.");
        return Ok(CleanOutcome::Rejected);
    }

    println!("Going to clean data");
    tracing::info!(url = gateway.url(), "requesting instance data clean");
    match gateway.data_clean(CONFIRMATION_PHRASE).await {
        Ok(_) => {
            println!("✅ Instance data cleaned.");
            Ok(CleanOutcome::Cleaned)
        }
        Err(e) if e.status() == Some(404) => {
            eprintln!("❌ [404] Data clean is not supported by the server");
            Ok(CleanOutcome::Unsupported)
        }
        Err(e) => Err(e.into()),
    }
}
