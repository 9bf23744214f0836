use std::io;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rowdump::Opts;
use rowdump::emit::RowEmitter;
use rowdump::error::Result;
use rowdump::strategy::Strategy;
use rowdump::sync::Conn;

/// Dump query results as COPY-style text, comparing row acquisition strategies.
#[derive(Debug, Parser)]
#[command(name = "rowdump")]
struct Cli {
    /// Connection string: libpq-style key=value pairs or a postgres:// URL
    #[arg(short = 'd', value_name = "CONNSTR", default_value = "dbname=postgres")]
    conninfo: String,

    /// SQL command to execute
    #[arg(short = 'c', value_name = "SQLCOMMAND", default_value = "show all")]
    command: String,

    /// Load the full result set at once (default)
    #[arg(short = 'f', group = "mode")]
    full: bool,

    /// Single-row mode
    #[arg(short = 's', group = "mode")]
    single_row: bool,

    /// Single-row mode with direct access to the decode buffer
    #[arg(short = 'z', group = "mode")]
    zero_copy: bool,

    /// Single-row mode with a minimal per-row copy
    #[arg(short = 'x', group = "mode")]
    fake_copy: bool,
}

impl Cli {
    fn strategy(&self) -> Strategy {
        if self.single_row {
            Strategy::SingleRow
        } else if self.zero_copy {
            Strategy::ZeroCopy
        } else if self.fake_copy {
            Strategy::FakeCopy
        } else {
            Strategy::Full
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let opts = Opts::try_from(cli.conninfo.as_str())?;
    let mut conn = Conn::new(&opts)?;

    let stdout = io::stdout();
    let mut emitter = RowEmitter::new(stdout.lock());
    cli.strategy().run(&mut conn, &cli.command, &mut emitter)?;

    conn.close()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.kind() == clap::error::ErrorKind::DisplayHelp => {
            print!("{err}");
            process::exit(0);
        }
        Err(err) => {
            // unknown or conflicting flags: usage to stderr, exit 1
            eprint!("{err}");
            process::exit(1);
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("rowdump: {err}");
        process::exit(1);
    }
}
