use clap::Parser;
use craftcon::client;
use log::{LevelFilter, Metadata, Record};

/// Send a single command to a Minecraft server over rcon.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address for the server's rcon instance, in host:port format.
    #[arg(short, long, default_value = "127.0.0.1:25575")]
    address: String,

    /// Password for authenticating with the server.
    #[arg(short, long)]
    password: String,

    /// Command string to send to the server. This should be wrapped in
    /// quotes if the command is longer than one word.
    #[arg(short, long)]
    command: String,

    /// Increase log verbosity (-v for info, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: SimpleLogger = SimpleLogger;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Trace,
    };
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));

    match client::send_command(&args.address, &args.password, &args.command).await {
        Ok(response) => {
            if !response.is_empty() {
                print!("{response}");
            }
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
