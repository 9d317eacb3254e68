use std::{sync::Arc, time::Duration};

use memoq::{Config, Element, MemoQServer, ServiceKind, WebService};
use memoq_util::soap::SoapVersion;
use serde_json::{json, Value};
use structopt::StructOpt;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum Error {
    #[error("memoQ request failed")]
    MemoQ(#[from] memoq::Error),

    #[error("Unable to read WSDL")]
    Wsdl(#[from] memoq_wsdl::error::Error),

    #[error("Unable to write JSON")]
    Json(#[from] serde_json::Error),

    #[error("Unable to write output")]
    Io(#[from] std::io::Error),

    #[error("Expected an argument of the form name=value, got {0:?}")]
    Argument(String),
}

#[derive(StructOpt)]
struct Args {
    /// Base URL of the memoQ server
    #[structopt(long, env = "MEMOQ_BASE_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Sent as the ApiKey header of every call
    #[structopt(long, env = "MEMOQ_API_KEY")]
    api_key: Option<String>,

    /// Request timeout in seconds
    #[structopt(long, env = "MEMOQ_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Log more, repeat for trace output
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Print the server's API version
    Version,
    /// Print the server's version and address
    Summary,
    Projects,
    Tms,
    Tbs,
    Users,
    Groups,
    Corpora,
    /// List the operations a service declares
    Operations { service: ServiceKind },
    /// Show the port and operations of a WSDL file or URL
    Inspect { wsdl: String },
    /// Call any operation, passing each name=value pair as a text argument
    Call {
        service: ServiceKind,
        operation: String,
        arguments: Vec<String>,
    },
}

#[paw::main]
fn main(args: Args) -> Result<(), Error> {
    init_logging(args.verbose);

    let mut config = Config::new(&args.url)?;
    if let Some(api_key) = args.api_key {
        config = config.with_api_key(api_key);
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout(Duration::from_secs(timeout));
    }

    debug!(?config, "starting");

    let transport = config.transport()?;
    let server = MemoQServer::with_transport(config.clone(), Arc::clone(&transport));

    match args.command {
        Command::Version => println!("{}", server.api_version()?),
        Command::Summary => println!("{}", server.summary()?),
        Command::Projects => print_items(server.projects()?)?,
        Command::Tms => print_items(server.tms()?)?,
        Command::Tbs => print_items(server.tbs()?)?,
        Command::Users => print_items(server.users()?)?,
        Command::Groups => print_items(server.groups()?)?,
        Command::Corpora => print_items(server.corpora()?)?,

        Command::Operations { service } => {
            let service = WebService::connect(service, &config, transport)?;
            print_json(service.operations().collect::<Vec<_>>().into())?;
        }

        Command::Inspect { wsdl } => {
            let definition = memoq_wsdl::parse(&wsdl, transport.as_ref())?;
            let port = definition.resolve_port(SoapVersion::V11)?;

            let operations = port
                .operations
                .iter()
                .map(|operation| {
                    json!({
                        "name": operation.name,
                        "action": operation.action,
                        "documentation": operation.documentation,
                    })
                })
                .collect::<Vec<_>>();

            print_json(json!({
                "service": port.service,
                "port": port.name,
                "location": port.location,
                "operations": operations,
            }))?;
        }

        Command::Call {
            service,
            operation,
            arguments,
        } => {
            let arguments = arguments
                .iter()
                .map(|argument| match argument.split_once('=') {
                    Some((name, value)) => Ok(Element::new(name, value)),
                    None => Err(Error::Argument(argument.clone())),
                })
                .collect::<Result<Vec<_>, _>>()?;

            let service = WebService::connect(service, &config, transport)?;
            let response = service.call(&operation, arguments)?;
            print_json(Value::Object(response.to_map()))?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "memoq=warn,memoq_wsdl=warn,memoq_util=warn",
        1 => "memoq=debug,memoq_wsdl=debug,memoq_util=debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_items(items: Vec<Element>) -> Result<(), Error> {
    print_json(memoq::to_values(&items).into())
}

fn print_json(value: Value) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
