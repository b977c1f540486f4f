//! tlcodec-dump: decode one TL payload against a schema file.
//!
//!   tlcodec-dump [--functions] [--no-gzip] <schema.tl> [hex]
//!
//! The payload is read from stdin when no hex argument is given. Whitespace
//! in the hex is ignored, so `xxd -p` output can be piped in directly.
//!
//! Logging: RUST_LOG=tlcodec=trace shows every dispatched constructor.

use std::io::Read;

use env_logger::Env;
use tlcodec::{DecodeConfig, Registry, SchemaOptions};
use tlcodec_schema::Schema;

const USAGE: &str = "usage: tlcodec-dump [--functions] [--no-gzip] <schema.tl> [hex]";

struct Args {
    schema: String,
    hex: Option<String>,
    options: SchemaOptions,
    config: DecodeConfig,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("tlcodec=info")).init();

    if let Err(e) = run() {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args(std::env::args().skip(1))?;

    let text = std::fs::read_to_string(&args.schema)
        .map_err(|e| format!("{}: {e}", args.schema))?;
    let schema = Schema::parse(&text).map_err(|e| format!("{}: {e}", args.schema))?;
    log::info!(
        "{}: {} definitions, layer {}",
        args.schema,
        schema.definitions.len(),
        schema.layer.map_or_else(|| "unknown".to_owned(), |l| l.to_string())
    );

    let mut builder = Registry::builder();
    builder.register_schema(&schema, args.options)?;
    let registry = builder.build();

    let hex = match args.hex {
        Some(hex) => hex,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };
    let hex: String = hex.split_whitespace().collect();
    let bytes = hex::decode(hex.trim_start_matches("0x"))?;

    let object = registry.decode_with(&bytes, args.config)?;
    println!("{object:#?}");
    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut options = SchemaOptions::default();
    let mut config = DecodeConfig::default();
    let mut positional = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--functions" => options.include_functions = true,
            "--no-gzip" => config.unpack_gzip = false,
            "-h" | "--help" => return Err(USAGE.to_owned()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}\n{USAGE}")),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let schema = positional.next().ok_or_else(|| USAGE.to_owned())?;
    let hex = positional.next();
    if positional.next().is_some() {
        return Err(USAGE.to_owned());
    }
    Ok(Args { schema, hex, options, config })
}
