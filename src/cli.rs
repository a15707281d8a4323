use std::fs::File;
use std::io::{Read, Write};

use paulstretch::{StretchParams, StretchPipeline};
use simple_logger::SimpleLogger;

/// Default size of the read chunks fed into the pipeline.
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        print_usage();
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];

    let mut stretch: f64 = 8.0;
    let mut window_secs: f64 = 0.25;
    let mut onset_level: f64 = 10.0;
    let mut seed: Option<u64> = None;
    let mut no_expand_mono = false;
    let mut chunk_size = DEFAULT_CHUNK_SIZE;
    let mut verbose = false;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--stretch" | "-s" => {
                i += 1;
                stretch = parse_f64(&args, i, "stretch");
            }
            "--window" | "-w" => {
                i += 1;
                window_secs = parse_f64(&args, i, "window");
            }
            "--onset" | "-o" => {
                i += 1;
                onset_level = parse_f64(&args, i, "onset");
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_u64(&args, i, "seed"));
            }
            "--no-expand-mono" => no_expand_mono = true,
            "--chunk-size" => {
                i += 1;
                chunk_size = parse_u64(&args, i, "chunk-size") as usize;
                if chunk_size == 0 {
                    eprintln!("Error: chunk-size must be greater than 0");
                    std::process::exit(1);
                }
            }
            "--verbose" | "-v" => verbose = true,
            // Legacy positional: stretch [window [onset]]
            other => {
                match other.parse::<f64>() {
                    Ok(value) if i == 3 => stretch = value,
                    Ok(value) if i == 4 => window_secs = value,
                    Ok(value) if i == 5 => onset_level = value,
                    _ => {
                        eprintln!("Error: unknown argument '{}'", other);
                        print_usage();
                        std::process::exit(1);
                    }
                }
            }
        }
        i += 1;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = SimpleLogger::new().with_level(level).init();

    let mut params = match StretchParams::new(stretch) {
        Ok(params) => params
            .with_window_secs(window_secs)
            .with_onset_level(onset_level)
            .with_mono_expansion(!no_expand_mono),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };
    if let Some(seed) = seed {
        params = params.with_seed(seed);
    }

    log::info!(
        "stretching '{}' -> '{}' (factor {}, window {} s)",
        input_path,
        output_path,
        stretch,
        window_secs
    );

    if let Err(err) = run(input_path, output_path, params, chunk_size) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(
    input_path: &str,
    output_path: &str,
    params: StretchParams,
    chunk_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pipeline = StretchPipeline::new(params)?;
    let mut input = File::open(input_path)?;
    let mut output = File::create(output_path)?;

    let mut chunk = vec![0u8; chunk_size];
    let mut bytes_in: u64 = 0;
    let mut bytes_out: u64 = 0;

    loop {
        let read = input.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        bytes_in += read as u64;
        let produced = pipeline.process(&chunk[..read])?;
        bytes_out += produced.len() as u64;
        output.write_all(&produced)?;
    }

    let tail = pipeline.finish()?;
    bytes_out += tail.len() as u64;
    output.write_all(&tail)?;
    output.flush()?;

    log::info!("done: {} bytes in, {} bytes out", bytes_in, bytes_out);
    Ok(())
}

fn parse_f64(args: &[String], i: usize, name: &str) -> f64 {
    match args.get(i).and_then(|v| v.parse().ok()) {
        Some(value) => value,
        None => {
            eprintln!("Error: expected a number for --{}", name);
            std::process::exit(1);
        }
    }
}

fn parse_u64(args: &[String], i: usize, name: &str) -> u64 {
    match args.get(i).and_then(|v| v.parse().ok()) {
        Some(value) => value,
        None => {
            eprintln!("Error: expected an integer for --{}", name);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Paulstretch - extreme audio time stretching");
    eprintln!();
    eprintln!("Usage: paulstretch <input.wav> <output.wav> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --stretch, -s <factor>   Stretch factor, > 0 (default: 8.0)");
    eprintln!("  --window, -w <secs>      Analysis window length (default: 0.25)");
    eprintln!("  --onset, -o <level>      Onset sensitivity (default: 10.0)");
    eprintln!("  --seed <n>               Fix the phase randomizer seed");
    eprintln!("  --no-expand-mono         Keep mono input mono");
    eprintln!("  --chunk-size <bytes>     Read chunk size (default: 65536)");
    eprintln!("  --verbose, -v            Debug logging");
}
