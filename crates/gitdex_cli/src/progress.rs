//! Rendering of pipeline progress events.
//!
//! TTY runs get short console lines; non-TTY runs get structured tracing
//! output so logs stay machine-readable.

use console::{Term, style};
use gitdex::{ProgressCallback, PushProgress};

/// Build the callback handed to the push pipeline.
pub(crate) fn progress_callback() -> ProgressCallback {
    let is_tty = Term::stdout().is_term();
    Box::new(move |event| {
        if is_tty {
            render_console(&event);
        } else {
            render_logging(&event);
        }
    })
}

fn render_console(event: &PushProgress) {
    match event {
        PushProgress::Listing { kind } => {
            println!("Listing {kind}...");
        }
        PushProgress::Listed { kind, count } => {
            println!("Found {} {kind}", style(count).bold());
        }
        PushProgress::EventsFetched { entity, count } => {
            println!("  {entity}: {count} timeline events");
        }
        PushProgress::FetchRetry {
            entity,
            retry_after_ms,
            attempt,
        } => {
            println!(
                "  {} fetching {entity}, retrying in {}ms (attempt {attempt})",
                style("transient failure").yellow(),
                retry_after_ms
            );
        }
        PushProgress::Pushed { entity, activities } => {
            if *activities > 0 {
                println!(
                    "  {} {entity} ({activities} activities)",
                    style("pushed").green()
                );
            } else {
                println!("  {} {entity}", style("pushed").green());
            }
        }
        PushProgress::EntityError { entity, message } => {
            println!("  {} {entity}: {message}", style("failed").red());
        }
        PushProgress::Complete {
            processed,
            pushed,
            skipped,
            errors,
        } => {
            println!();
            println!(
                "Done: {} pushed, {} skipped of {} processed",
                style(pushed).green(),
                style(skipped).yellow(),
                processed
            );
            if *errors > 0 {
                println!("{} error(s) recorded, see above", style(errors).red());
            }
        }
    }
}

fn render_logging(event: &PushProgress) {
    match event {
        PushProgress::Listing { kind } => {
            tracing::info!(kind = %kind, "listing entities");
        }
        PushProgress::Listed { kind, count } => {
            tracing::info!(kind = %kind, count, "entities listed");
        }
        PushProgress::EventsFetched { entity, count } => {
            tracing::debug!(entity = %entity, count, "timeline fetched");
        }
        PushProgress::FetchRetry {
            entity,
            retry_after_ms,
            attempt,
        } => {
            tracing::debug!(entity = %entity, retry_after_ms, attempt, "retrying fetch");
        }
        PushProgress::Pushed { entity, activities } => {
            tracing::info!(entity = %entity, activities, "entity pushed");
        }
        PushProgress::EntityError { entity, message } => {
            tracing::warn!(entity = %entity, message = %message, "entity failed");
        }
        PushProgress::Complete {
            processed,
            pushed,
            skipped,
            errors,
        } => {
            tracing::info!(processed, pushed, skipped, errors, "push complete");
        }
    }
}
