// src/main.rs
mod cli;
mod logger;
mod utils;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use huffcodec::{CodeTable, FrequencyTable, HuffmanCodec, codec};
use tracing::info;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    match cli.command {
        Commands::Compress {
            input,
            output,
            freq,
        } => {
            let output = output.unwrap_or_else(|| utils::compressed_path(&input));
            let freq = freq.unwrap_or_else(|| utils::sidecar_path(&output));
            compress_file(&input, &output, &freq)?;
        }
        Commands::Decompress {
            input,
            freq,
            output,
        } => {
            let freq = freq.unwrap_or_else(|| utils::sidecar_path(&input));
            let output = output.unwrap_or_else(|| utils::decompressed_path(&input));
            decompress_file(&input, &freq, &output)?;
        }
        Commands::Roundtrip { input } => roundtrip_file(&input)?,
        Commands::Inspect { input } => inspect_file(&input)?,
    }

    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn compress_file(input: &Path, output: &Path, freq_path: &Path) -> anyhow::Result<()> {
    let text = read_text(input)?;
    let symbols: Vec<char> = text.chars().collect();

    let freqs = FrequencyTable::from_symbols(&symbols)
        .with_context(|| format!("cannot compress {}", input.display()))?;
    let mut codec = HuffmanCodec::with_table(CodeTable::from_frequencies(&freqs));
    let bytes = codec.compress(&symbols)?;

    utils::write_atomic(output, &bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;
    utils::write_atomic(freq_path, &freqs.to_bytes()?)
        .with_context(|| format!("failed to write {}", freq_path.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        sidecar = %freq_path.display(),
        "compressed"
    );
    println!("File compressed successfully: {}", output.display());
    println!(
        "{} -> {}",
        utils::format_bytes(text.len()),
        utils::format_bytes(bytes.len())
    );
    Ok(())
}

fn decompress_file(input: &Path, freq_path: &Path, output: &Path) -> anyhow::Result<()> {
    let bytes = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let sidecar =
        fs::read(freq_path).with_context(|| format!("failed to read {}", freq_path.display()))?;

    let freqs = FrequencyTable::<char>::from_bytes(&sidecar)
        .with_context(|| format!("invalid frequency sidecar {}", freq_path.display()))?;
    let table = CodeTable::from_frequencies(&freqs);
    let text = codec::decompress_text(&bytes, &table)
        .with_context(|| format!("cannot decompress {}", input.display()))?;

    utils::write_atomic(output, text.as_bytes())
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(input = %input.display(), output = %output.display(), "decompressed");
    println!("File decompressed successfully: {}", output.display());
    Ok(())
}

fn roundtrip_file(input: &Path) -> anyhow::Result<()> {
    let compressed = utils::compressed_path(input);
    let sidecar = utils::sidecar_path(&compressed);
    let restored: PathBuf = utils::decompressed_path(&compressed);

    compress_file(input, &compressed, &sidecar)?;
    decompress_file(&compressed, &sidecar, &restored)?;

    if read_text(input)? != read_text(&restored)? {
        bail!(
            "round trip mismatch between {} and {}",
            input.display(),
            restored.display()
        );
    }
    println!("Round trip verified");
    Ok(())
}

fn inspect_file(input: &Path) -> anyhow::Result<()> {
    let text = read_text(input)?;
    let freqs = FrequencyTable::from_text(&text)
        .with_context(|| format!("cannot inspect {}", input.display()))?;
    let table = CodeTable::from_frequencies(&freqs);

    println!("{:<10} {:>10}  code", "symbol", "count");
    for (symbol, code) in table.iter() {
        println!(
            "{:<10} {:>10}  {}",
            format!("{symbol:?}"),
            freqs.get(&symbol),
            code
        );
    }

    let body_bits = table.encoded_len(&freqs);
    println!("symbols: {} ({} distinct)", freqs.total(), freqs.len());
    println!("entropy: {:.4} bits/symbol", freqs.entropy());
    println!(
        "average code length: {:.4} bits/symbol",
        body_bits as f64 / freqs.total() as f64
    );
    let packed =
        utils::packed_size(body_bits).context("compressed size does not fit in memory")?;
    println!("compressed size: {}", utils::format_bytes(packed));
    Ok(())
}
