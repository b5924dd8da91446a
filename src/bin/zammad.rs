//! Zammad API CLI binary.
//!
//! A command-line interface for interacting with the Zammad API.

use clap::Parser;
use serde_json::Value;
use std::process::ExitCode;
use tabled::Table;
use zammad::cli::{Cli, Command, Entity, PagingArgs};
use zammad::output::{PrettyPrint, RecordRow};
use zammad::{Pagination, Payload, ZammadClient};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match ZammadClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set ZAMMAD_URL and ZAMMAD_HTTP_TOKEN environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &ZammadClient, cli: Cli) -> zammad::Result<()> {
    let _scope = cli
        .on_behalf_of
        .as_deref()
        .map(|user| client.request_on_behalf_of(user));

    let json = cli.json;
    match cli.command {
        Command::Get { entity, id } => {
            let record = client.resource(entity.kind()).find(&id).await?;
            output_single(&record, json)
        }
        Command::List { entity, paging } => {
            handle_list(client, entity, None, &paging, json).await
        }
        Command::Search {
            entity,
            query,
            paging,
        } => handle_list(client, entity, Some(&query), &paging, json).await,
        Command::Create { entity, data } => {
            let record = client.resource(entity.kind()).create(&data).await?;
            output_single(&record, json)
        }
        Command::Update { entity, id, data } => {
            let record = client.resource(entity.kind()).update(&id, &data).await?;
            output_single(&record, json)
        }
        Command::Delete { entity, id } => {
            let response = client.resource(entity.kind()).destroy(&id).await?;
            output_single(&response, json)
        }
        Command::Me => {
            let me = client.user().me().await?;
            output_single(&me, json)
        }
    }
}

async fn handle_list(
    client: &ZammadClient,
    entity: Entity,
    query: Option<&str>,
    paging: &PagingArgs,
    json: bool,
) -> zammad::Result<()> {
    let resource = client.resource(entity.kind());
    let filters = paging.to_filters();

    let mut page = match query {
        Some(query) => resource.search(query, paging.page, Some(&filters)).await?,
        None => resource.all(paging.page, Some(&filters)).await?,
    };

    loop {
        output_page(&page, json)?;
        if !paging.all_pages || page.is_last_page() {
            break;
        }
        page = page.next_page().await?;
    }
    Ok(())
}

fn output_single(payload: &Payload, json: bool) -> zammad::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(payload)?);
    } else {
        println!("{}", payload.pretty_print());
    }
    Ok(())
}

fn output_page(page: &Pagination<'_>, json: bool) -> zammad::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page.items())?);
    } else {
        let rows: Vec<RecordRow> = page.iter().map(|r: &Value| RecordRow::from(r)).collect();
        println!("{}", Table::new(rows));
        if page.is_last_page() {
            println!("\nPage {} (end)", page.page());
        } else {
            println!("\nPage {} (more available)", page.page());
        }
    }
    Ok(())
}
