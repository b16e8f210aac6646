use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::DateTime;
use clap::Parser;
use rsnk2::{NickFile, OpenOptions, RecordEntry, StderrLogger, ValueType};

/// Windows filetime of 1970-01-01 00:00:00 UTC
const FILETIME_UNIX_EPOCH: u64 = 116_444_736_000_000_000;

#[derive(Debug, Parser)]
#[command(
    name = "nk2info",
    about = "Shows information about an Outlook Nickfile (NK2)"
)]
struct Arguments {
    /// Path of the Nickfile
    source: PathBuf,

    /// Codepage of the single-byte string properties
    #[arg(short, long)]
    codepage: Option<u16>,

    /// Also list every alias item's record entries
    #[arg(short, long)]
    entries: bool,

    /// Print decode debug output on standard error
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Arguments::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("nk2info: {error} ({}.{})", error.domain(), error.code());
            let mut cause = error.source();
            while let Some(error) = cause {
                eprintln!("nk2info: caused by: {error}");
                cause = error.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Arguments) -> rsnk2::Result<()> {
    let mut options = OpenOptions::new();
    if let Some(codepage) = args.codepage {
        options = options.ascii_codepage(codepage);
    }
    if args.debug {
        options = options.logger(Box::new(StderrLogger));
    }
    let file = NickFile::open_with_options(&args.source, options)?;

    println!("Nickfile information:");
    match file.modification_time() {
        Some(filetime) => println!("\tModification time:\t{}", format_filetime(filetime)),
        None => println!("\tModification time:\tnot present"),
    }
    println!("\tNumber of aliases:\t{}", file.number_of_items());

    if args.entries {
        for (item_index, item) in file.items().enumerate() {
            println!();
            println!(
                "Alias: {item_index} with {} entries:",
                item.number_of_entries()
            );
            for entry in item.entries() {
                let value_type = ValueType::from_code(entry.value_type() as u16);
                let identifier = value_type.map_or("unknown", |value_type| value_type.identifier());
                println!(
                    "\t0x{:04x} 0x{:04x} {:<12} {}",
                    entry.entry_type(),
                    entry.value_type(),
                    identifier,
                    render_value(entry, value_type)
                );
            }
        }
    }
    Ok(())
}

fn format_filetime(filetime: u64) -> String {
    if filetime < FILETIME_UNIX_EPOCH {
        return format!("0x{filetime:016x}");
    }
    let ticks = filetime - FILETIME_UNIX_EPOCH;
    let seconds = (ticks / 10_000_000) as i64;
    let nanoseconds = (ticks % 10_000_000) as u32 * 100;

    match DateTime::from_timestamp(seconds, nanoseconds) {
        Some(datetime) => datetime.format("%b %d, %Y %H:%M:%S UTC").to_string(),
        None => format!("0x{filetime:016x}"),
    }
}

fn render_value(entry: &RecordEntry, value_type: Option<ValueType>) -> String {
    let rendered = match value_type {
        Some(ValueType::Boolean) => entry.as_bool().map(|value| value.to_string()),
        Some(ValueType::Integer16) => entry.as_i16().map(|value| value.to_string()),
        Some(ValueType::Integer32) | Some(ValueType::ErrorCode) => {
            entry.as_i32().map(|value| value.to_string())
        }
        Some(ValueType::Integer64) | Some(ValueType::Currency) => {
            entry.as_i64().map(|value| value.to_string())
        }
        Some(ValueType::Float32) | Some(ValueType::Double64) => {
            entry.as_floating_point().map(|value| value.to_string())
        }
        Some(ValueType::Filetime) => entry.as_filetime().map(format_filetime),
        Some(ValueType::Floatingtime) => entry.as_floatingtime().map(|value| value.to_string()),
        Some(ValueType::StringAscii) | Some(ValueType::StringUnicode) => entry.to_utf8_string(),
        Some(ValueType::Guid) => {
            let mut guid = [0u8; 16];
            entry.as_guid(&mut guid).map(|()| {
                guid.iter()
                    .map(|byte| format!("{byte:02x}"))
                    .collect::<String>()
            })
        }
        _ => Ok(format!("<{} bytes>", entry.value_data_size())),
    };
    rendered.unwrap_or_else(|error| format!("<{error}>"))
}
