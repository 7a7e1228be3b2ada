use clap::{Parser, Subcommand};
use hound::WavSpec;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;

use chirplink_core::{hex, DecodePipeline, Decoder, Encoder, SAMPLES_PER_SYMBOL, SAMPLE_RATE};

#[derive(Parser)]
#[command(name = "chirplink")]
#[command(about = "Acoustic data-link modem for short payloads over audio")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a payload to a WAV audio file
    Encode {
        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Payload as a UTF-8 string
        #[arg(short, long, conflicts_with_all = ["hex", "file"])]
        message: Option<String>,

        /// Payload as a hex string
        #[arg(short = 'x', long, conflicts_with_all = ["message", "file"])]
        hex: Option<String>,

        /// Payload read as raw bytes from a file
        #[arg(short, long, conflicts_with_all = ["message", "hex"])]
        file: Option<PathBuf>,
    },

    /// Decode a WAV audio file back to payloads
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,
    },

    /// Decode raw signed 16-bit little-endian PCM from stdin until EOF
    Listen,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("one of --message, --hex, or --file is required")]
    MissingPayload,

    #[error("unsupported WAV format: {0} Hz, {1} channels, {2} bits (need {rate} Hz mono 16-bit)", rate = SAMPLE_RATE)]
    UnsupportedWav(u32, u16, u16),

    #[error("no frame decoded")]
    NoFrame,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            output,
            message,
            hex,
            file,
        } => encode_command(&output, message, hex, file),
        Commands::Decode { input } => decode_command(&input),
        Commands::Listen => listen_command(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn encode_command(
    output_path: &PathBuf,
    message: Option<String>,
    hex_text: Option<String>,
    file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = match (message, hex_text, file) {
        (Some(m), _, _) => m.into_bytes(),
        (None, Some(h), _) => hex::decode(&h)?,
        (None, None, Some(path)) => std::fs::read(path)?,
        (None, None, None) => return Err(CliError::MissingPayload.into()),
    };

    let encoder = Encoder::new();
    let samples = encoder.encode(&payload)?;
    println!(
        "Encoded {} bytes to {} audio samples",
        payload.len(),
        samples.len()
    );

    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let file = File::create(output_path)?;
    let mut writer = hound::WavWriter::new(file, spec)?;
    for sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    println!("Wrote {}", output_path.display());
    Ok(())
}

fn decode_command(input_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(input_path)?;
    let mut reader = hound::WavReader::new(file)?;

    let spec = reader.spec();
    log::debug!(
        "WAV format: {} Hz, {} channels, {} bits",
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample
    );
    if spec.sample_rate != SAMPLE_RATE as u32
        || spec.channels != 1
        || spec.bits_per_sample != 16
        || spec.sample_format != hound::SampleFormat::Int
    {
        return Err(
            CliError::UnsupportedWav(spec.sample_rate, spec.channels, spec.bits_per_sample).into(),
        );
    }

    let samples: Result<Vec<i16>, _> = reader.samples::<i16>().collect();
    let samples = samples?;
    println!("Read {} samples from {}", samples.len(), input_path.display());

    let mut decoded_any = false;
    let chunks = samples.chunks(SAMPLES_PER_SYMBOL).map(|c| c.to_vec());
    for event in Decoder::new().frames(chunks) {
        match event {
            Ok(payload) => {
                decoded_any = true;
                print_payload(&payload);
            }
            Err(e) => eprintln!("frame failed: {e}"),
        }
    }

    if decoded_any {
        Ok(())
    } else {
        Err(CliError::NoFrame.into())
    }
}

fn listen_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut pipeline = DecodePipeline::new();
    let mut stdin = std::io::stdin().lock();
    let mut buf = vec![0u8; SAMPLES_PER_SYMBOL * 2];

    loop {
        // Fill one whole chunk per iteration; a short tail at EOF is still
        // analyzed (the spectrum layer zero-pads it).
        let mut filled = 0;
        while filled < buf.len() {
            let n = stdin.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == 0 {
            break;
        }

        let chunk: Vec<i16> = buf[..filled - filled % 2]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        pipeline.push(chunk)?;

        while let Some(event) = pipeline.try_next_frame() {
            report_event(event);
        }
        if filled < buf.len() {
            break;
        }
    }

    pipeline.close();
    while let Some(event) = pipeline.try_next_frame() {
        report_event(event);
    }
    Ok(())
}

fn report_event(event: chirplink_core::Result<Vec<u8>>) {
    match event {
        Ok(payload) => print_payload(&payload),
        Err(e) => eprintln!("frame failed: {e}"),
    }
}

fn print_payload(payload: &[u8]) {
    println!(
        "{} bytes: {} ({})",
        payload.len(),
        hex::encode(payload),
        String::from_utf8_lossy(payload)
    );
}
