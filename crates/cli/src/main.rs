use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rtsp::{BufferPool, PoolConfig, RequestReader, RtspRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rtsp-message",
    about = "Parse RTSP requests from a file or stdin and print or re-serialize them"
)]
struct Args {
    /// Input file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Write each request back out in wire format instead of a summary
    #[arg(long, short)]
    reserialize: bool,

    /// Maximum idle read buffers kept for reuse
    #[arg(long, default_value_t = PoolConfig::default().max_spare)]
    max_spare: usize,

    /// Size in bytes of each read buffer
    #[arg(long, default_value_t = PoolConfig::default().default_alloc_size)]
    alloc_size: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let pool = BufferPool::global();
    pool.configure(&PoolConfig {
        max_spare: args.max_spare,
        default_alloc_size: args.alloc_size,
    });

    let input: Box<dyn Read> = match &args.input {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!("Failed to open {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let mut stdout = io::stdout().lock();
    let mut count = 0usize;
    for result in RequestReader::with_pool(input, pool.clone()) {
        let request = match result {
            Ok(request) => request,
            Err(e) => {
                eprintln!("Failed to read request: {}", e);
                return ExitCode::FAILURE;
            }
        };
        count += 1;

        let written = if args.reserialize {
            request.write_to(&mut stdout)
        } else {
            print_summary(&mut stdout, &request)
        };
        if let Err(e) = written {
            eprintln!("Failed to write output: {}", e);
            return ExitCode::FAILURE;
        }
    }

    tracing::info!(requests = count, pool = %pool.stats(), "done");
    ExitCode::SUCCESS
}

fn print_summary(out: &mut impl Write, request: &RtspRequest) -> io::Result<()> {
    writeln!(out, "{} {}", request.method, request.url)?;
    for (name, values) in &request.header {
        writeln!(out, "  {}: {}", name, values.join(", "))?;
    }
    writeln!(out, "  ({} content bytes)", request.content.len())
}
