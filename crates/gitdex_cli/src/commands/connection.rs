use console::style;
use gitdex::Settings;
use gitdex::graph::{ExternalConnection, GraphClient, ItemType, resolver_for};

fn client(settings: &Settings) -> Result<GraphClient, Box<dyn std::error::Error>> {
    Ok(GraphClient::new(
        &settings.graph_host,
        &settings.graph_token,
    )?)
}

pub(crate) async fn create(
    settings: &Settings,
    id: &str,
    name: &str,
    description: Option<String>,
    item_type: ItemType,
) -> Result<(), Box<dyn std::error::Error>> {
    let connection = ExternalConnection {
        id: id.to_string(),
        name: name.to_string(),
        description,
        activity_settings: Some(resolver_for(item_type, &settings.owner, &settings.repo)),
    };

    let created = client(settings)?.create_connection(&connection).await?;
    println!(
        "{} connection {} ({item_type})",
        style("Created").green(),
        style(&created.id).bold()
    );
    println!("Register its schema next:");
    println!("  gitdex schema register {} --item-type {item_type}", created.id);
    Ok(())
}

pub(crate) async fn list(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let connections = client(settings)?.list_connections().await?;
    if connections.is_empty() {
        println!("No connections found.");
        return Ok(());
    }

    for connection in connections {
        match connection.description {
            Some(description) => {
                println!(
                    "{}  {}  {}",
                    style(&connection.id).bold(),
                    connection.name,
                    style(description).dim()
                );
            }
            None => println!("{}  {}", style(&connection.id).bold(), connection.name),
        }
    }
    Ok(())
}

pub(crate) async fn delete(
    settings: &Settings,
    id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    client(settings)?.delete_connection(id).await?;
    println!("{} connection {}", style("Deleted").green(), style(id).bold());
    Ok(())
}

pub(crate) async fn add_activity_settings(
    settings: &Settings,
    id: &str,
    item_type: ItemType,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolvers = resolver_for(item_type, &settings.owner, &settings.repo);
    client(settings)?.add_activity_settings(id, &resolvers).await?;
    println!(
        "{} {item_type} URL resolver on {}",
        style("Configured").green(),
        style(id).bold()
    );
    Ok(())
}
