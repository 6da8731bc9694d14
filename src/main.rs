use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;

use cached_dispatch::config::Config;
use cached_dispatch::transport::UreqTransport;
use cached_dispatch::{cache, Dispatcher, Method, Request, Response};

#[derive(Parser, Debug)]
#[command(version, about = "Sends GET/POST requests through a freshness checking response cache")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, default_value = "cached_dispatch.yaml")]
    config: PathBuf,

    /// GET or POST
    method: String,

    url: String,

    /// Request body for POST
    #[arg(short, long)]
    data: Option<String>,

    #[arg(long)]
    content_type: Option<String>,

    /// Dispatch the same request this many times
    #[arg(short, long, default_value_t = 1)]
    repeat: u32,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

fn init_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &config.log_config {
        log4rs::init_file(path, Default::default())?;
        return Ok(());
    }
    let level = LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::Info);
    let stderr = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let log_config = log4rs::config::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(log_config)?;
    Ok(())
}

fn outcome(response: &Response) -> &'static str {
    if response.is_local_error() {
        "failed locally"
    } else if response.is_not_modified() {
        "revalidated"
    } else if response.is_success() {
        "ok"
    } else {
        "rejected by origin"
    }
}

fn print_response(response: &Response) {
    println!("status: {} ({})", response.status_code(), outcome(response));
    for (name, values) in response.headers().iter() {
        for value in values {
            println!("{}: {}", name, value);
        }
    }
    if let Some(error) = response.error_message() {
        println!("error: {}", error);
    }
    if let Some(body) = response.body() {
        println!();
        println!("{}", body);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    if cli.dump_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }
    init_logging(&config)?;

    let method = Method::from_str(&cli.method)
        .map_err(|e| format!("unsupported method {:?}, expected GET or POST", e.0))?;
    let mut request = Request::new(cli.url.as_str()).with_method(method);
    if let Some(data) = cli.data {
        request = request.with_params(data);
    }
    if let Some(content_type) = cli.content_type {
        request = request.with_content_type(content_type);
    }

    let dispatcher = Dispatcher::new(
        Box::new(UreqTransport::new(&config.transport)),
        cache::from_config(&config.cache)?,
    );
    for attempt in 1..=cli.repeat {
        info!("Dispatch {} of {}: {} {}", attempt, cli.repeat, method, request.raw_url());
        let response = dispatcher.dispatch(&request)?;
        print_response(&response);
    }
    Ok(())
}
