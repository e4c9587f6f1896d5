extern crate getopts;
extern crate lzs;

use getopts::Options;
use lzs::error::Error;
use std::env;
use std::fs;
use std::process::ExitCode;

enum Mode {
    Compress,
    Decompress,
}

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} compress|decompress [options] INPUT OUTPUT", program);
    print!("{}", opts.usage(&brief));
}

fn run(mode: Mode, input: &str, output: &str, stats: bool) -> Result<(), ExitCode> {
    let src = fs::read(input).map_err(Error::Io).map_err(|e| {
        eprintln!("error: could not read {}: {}", input, e);
        ExitCode::from(2)
    })?;

    let out = match mode {
        Mode::Compress => lzs::compress(&src),
        Mode::Decompress => lzs::decompress(&src).map_err(|e| {
            eprintln!("error: could not decompress {}: {}", input, e);
            ExitCode::from(4)
        })?,
    };

    fs::write(output, &out).map_err(Error::Io).map_err(|e| {
        eprintln!("error: could not write {}: {}", output, e);
        ExitCode::from(3)
    })?;

    if stats {
        println!("input size: {}", src.len());
        println!("output size: {}", out.len());
        println!("ratio: {}", out.len() as f64 / src.len().max(1) as f64);
    }

    Ok(())
}

pub fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("s", "stats", "print input/output sizes and ratio");
    opts.optflag("h", "help", "print this help");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {}", e);
            print_usage(&program, &opts);
            return ExitCode::from(1);
        }
    };

    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return ExitCode::SUCCESS;
    }

    let mode = match matches.free.first().map(String::as_str) {
        Some("compress") => Mode::Compress,
        Some("decompress") => Mode::Decompress,
        _ => {
            print_usage(&program, &opts);
            return ExitCode::from(1);
        }
    };

    let (input, output) = match (matches.free.get(1), matches.free.get(2)) {
        (Some(i), Some(o)) => (i, o),
        _ => {
            print_usage(&program, &opts);
            return ExitCode::from(1);
        }
    };

    match run(mode, input, output, matches.opt_present("s")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}
