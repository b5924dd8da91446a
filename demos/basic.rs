//! Basic example demonstrating the Zammad API client.
//!
//! Run with:
//! ```
//! ZAMMAD_URL=https://helpdesk.example.com/api/v1 ZAMMAD_HTTP_TOKEN=your-token \
//!     cargo run --example basic
//! ```

use serde_json::json;
use zammad::{Filters, ZammadClient};

#[tokio::main]
async fn main() -> zammad::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Zammad client...");
    let client = ZammadClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    let me = client.user().me().await?;
    println!("Authenticated as {:?}", me.get("login"));

    // List first page of groups
    println!("\n--- Listing Groups (first page) ---");
    let groups = client.group();
    let page = groups.all(1, None).await?;
    println!("Found {} groups on page {}", page.len(), page.page());
    for group in &page {
        println!("  - {} ({})", group["name"], group["id"]);
    }

    // Walk every open ticket, five at a time
    println!("\n--- Searching Open Tickets ---");
    let tickets = client.ticket();
    let filters = Filters::new().with("per_page", 5);
    let mut page = tickets.search("state.name:open", 1, Some(&filters)).await?;
    loop {
        for ticket in &page {
            println!("  #{} {}", ticket["number"], ticket["title"]);
        }
        if page.is_last_page() {
            break;
        }
        page = page.next_page().await?;
    }

    // Create a ticket as a customer
    println!("\n--- Creating a Ticket on behalf of a customer ---");
    let created = {
        let as_customer = client.request_on_behalf_of("nicole.braun@zammad.org");
        as_customer
            .ticket()
            .create(&json!({
                "title": "Printer on fire",
                "group": "Users",
                "customer": "nicole.braun@zammad.org",
                "article": {
                    "subject": "Printer on fire",
                    "body": "It started smoking this morning.",
                    "type": "note",
                    "internal": false
                }
            }))
            .await?
    };
    let Some(id) = created.get("id").and_then(|v| v.as_u64()) else {
        println!("Unexpected response: {created:?}");
        return Ok(());
    };
    println!("Created ticket {id}");

    let articles = client.ticket().articles(id).await?;
    let count = articles
        .as_json()
        .and_then(|a| a.as_array())
        .map_or(0, Vec::len);
    println!("Ticket has {count} articles");

    client.tag().add("Ticket", id, "hardware").await?;
    println!("Tags: {:?}", client.tag().list("Ticket", id).await?.get("tags"));

    Ok(())
}
