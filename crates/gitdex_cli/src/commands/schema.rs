use std::time::Duration;

use console::style;
use gitdex::Settings;
use gitdex::graph::{GraphClient, ItemType, RegistrationError, RegistrationOptions, register_schema};

use crate::shutdown;

pub(crate) async fn register(
    settings: &Settings,
    connection_id: &str,
    item_type: ItemType,
    poll_secs: u64,
    timeout_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = GraphClient::new(&settings.graph_host, &settings.graph_token)?;
    let options = RegistrationOptions {
        poll_interval: Duration::from_secs(poll_secs),
        timeout: Duration::from_secs(timeout_secs),
    };
    let cancel = shutdown::cancel_on_ctrl_c();

    println!(
        "Registering {item_type} schema on {} (polling every {poll_secs}s, up to {timeout_secs}s)...",
        style(connection_id).bold()
    );

    match register_schema(&client, connection_id, item_type, &options, &cancel).await {
        Ok(()) => {
            println!("{} schema registered", style("Done:").green());
            Ok(())
        }
        Err(RegistrationError::TimedOut { waited }) => {
            println!(
                "{} still pending after {waited:?}; the server may finish later",
                style("Timed out:").yellow()
            );
            Err(RegistrationError::TimedOut { waited }.into())
        }
        Err(RegistrationError::Cancelled) => {
            println!("{} registration abandoned", style("Cancelled:").yellow());
            Err(RegistrationError::Cancelled.into())
        }
        Err(err) => {
            println!("{} {err}", style("Failed:").red());
            Err(err.into())
        }
    }
}
