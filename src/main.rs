//! Command line front end: look a section up, then dump its bytes.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use scalpel::find_section;

#[derive(Debug, Parser)]
#[command(version, about = "Carve a named section out of an ELF binary")]
struct Args {
    /// ELF file to carve
    file: PathBuf,
    /// Section name to look up, e.g. `.comment`
    section: String,
    /// Write the section's raw bytes instead of hex digits
    #[arg(short, long)]
    raw: bool,
    /// Print the located offset and size, skip reading the data
    #[arg(long)]
    range: bool,
    /// Message verbosity, repeatable
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn dump_hex<W: Write>(sink: &mut W, bytes: &[u8]) -> io::Result<()> {
    for byte in bytes {
        write!(sink, "{:02x}", byte)?;
    }
    writeln!(sink)
}

fn dump_raw<W: Write>(sink: &mut W, bytes: &[u8]) -> io::Result<()> {
    sink.write_all(bytes)
}

fn run(args: &Args) -> scalpel::Result<()> {
    let data = fs::read(&args.file)?;
    let range = find_section(&data, &args.section)?;
    let stdout = io::stdout();
    let mut sink = stdout.lock();
    if args.range {
        writeln!(sink, "{:#x} {:#x}", range.offset, range.size)?;
        return Ok(());
    }
    let mut fd = File::open(&args.file)?;
    let bytes = range.read_from(&mut fd)?;
    if args.raw {
        dump_raw(&mut sink, &bytes)?;
    } else {
        dump_hex(&mut sink, &bytes)?;
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    stderrlog::new()
        .verbosity(args.verbose as usize)
        .init()
        .unwrap();
    if let Err(err) = run(&args) {
        eprintln!("{}: {}", args.file.display(), err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_zero_padded_and_newline_terminated() {
        let mut sink = Vec::new();
        dump_hex(&mut sink, &[0x00, 0x0f, 0xff]).unwrap();
        assert_eq!(sink, b"000fff\n");
    }

    #[test]
    fn raw_is_verbatim() {
        let mut sink = Vec::new();
        dump_raw(&mut sink, b"key\0with\0nuls").unwrap();
        assert_eq!(sink, b"key\0with\0nuls");
    }
}
