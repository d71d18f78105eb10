use anyhow::Context;
use async_graphql::{Request, Variables};
use bookshelf_app::books::{load_store, schema::build_schema};
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Read-only GraphQL book catalogue")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the GraphQL HTTP server (default)
    Serve,
    /// Print the GraphQL schema in SDL form
    Sdl,
    /// Execute a single GraphQL query and print the JSON response
    Query {
        /// GraphQL document, e.g. '{ books { id title } }'
        query: String,
        /// Variables as a JSON object
        #[arg(long)]
        variables: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            bookshelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "bookshelf CLI serving");
            bookshelf_app::serve(&settings).await
        }
        Command::Sdl => {
            let store = load_store(&settings.books)?;
            print!("{}", build_schema(store, &settings.graphql).sdl());
            Ok(())
        }
        Command::Query { query, variables } => {
            let store = load_store(&settings.books)?;
            let schema = build_schema(store, &settings.graphql);

            let mut request = Request::new(query);
            if let Some(raw) = variables {
                let value: serde_json::Value =
                    serde_json::from_str(&raw).context("--variables must be a JSON object")?;
                if !value.is_object() {
                    anyhow::bail!("--variables must be a JSON object, got {value}");
                }
                request = request.variables(Variables::from_json(value));
            }

            let response = schema.execute(request).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
