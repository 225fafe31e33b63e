use clap::{Parser, Subcommand};
use hound::WavSpec;
use log::debug;
use rttywave_core::{
    RttyDecoder, RttyModulator, SampleClock, SliceSource, DEFAULT_BAUD_RATE, DEFAULT_WINDOW_SIZE,
    DEFAULT_ZC_THRESHOLD, MARK_FREQ, SAMPLE_RATE, SPACE_FREQ,
};
use std::fs::File;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("Unsupported WAV bit depth: {0}")]
    UnsupportedBitDepth(u16),
}

#[derive(Parser)]
#[command(name = "rttywave")]
#[command(about = "RTTY demodulator/decoder for Baudot teletype audio")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text to RTTY audio (WAV)
    Encode {
        /// Input text file
        #[arg(value_name = "INPUT.TXT")]
        input: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Baud rate
        #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: f64,

        /// Mark tone frequency in Hz
        #[arg(long, default_value_t = MARK_FREQ)]
        mark_freq: f32,

        /// Space tone frequency in Hz
        #[arg(long, default_value_t = SPACE_FREQ)]
        space_freq: f32,
    },

    /// Decode RTTY audio (WAV) to text
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Output text file
        #[arg(value_name = "OUTPUT.TXT")]
        output: PathBuf,

        /// Baud rate
        #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: f64,

        /// Discriminator window size in samples
        #[arg(short, long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: usize,

        /// Zero-crossing count at or above which a window reads as Space
        #[arg(short, long, default_value_t = DEFAULT_ZC_THRESHOLD)]
        threshold: usize,

        /// Trace decoder state transitions (needs RUST_LOG=debug)
        #[arg(long)]
        trace: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            baud,
            mark_freq,
            space_freq,
        } => encode_command(&input, &output, baud, mark_freq, space_freq)?,
        Commands::Decode {
            input,
            output,
            baud,
            window,
            threshold,
            trace,
        } => decode_command(&input, &output, baud, window, threshold, trace)?,
    }

    Ok(())
}

fn encode_command(
    input_path: &PathBuf,
    output_path: &PathBuf,
    baud: f64,
    mark_freq: f32,
    space_freq: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(input_path)?;
    println!("Read {} characters from {}", text.chars().count(), input_path.display());

    let mut modulator = RttyModulator::with_params(SAMPLE_RATE, baud, mark_freq, space_freq)?;
    let samples = modulator.modulate(&text);
    println!("Modulated to {} audio samples at {} baud", samples.len(), baud);

    // Write WAV file (16-bit PCM)
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let file = File::create(output_path)?;
    let mut writer = hound::WavWriter::new(file, spec)?;

    // Convert f32 samples to i16 range [-32768, 32767]
    for sample in samples {
        let clamped = sample.max(-1.0).min(1.0);
        writer.write_sample((clamped * 32767.0) as i16)?;
    }
    writer.finalize()?;

    println!("Wrote {}", output_path.display());
    Ok(())
}

fn decode_command(
    input_path: &PathBuf,
    output_path: &PathBuf,
    baud: f64,
    window: usize,
    threshold: usize,
    trace: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(input_path)?;
    let mut reader = hound::WavReader::new(file)?;

    let spec = reader.spec();
    println!(
        "Read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    // Extract samples (handle both 16-bit and 32-bit float formats)
    let samples: Vec<f32> = match spec.bits_per_sample {
        16 => {
            let int_samples: Result<Vec<i16>, _> = reader.samples::<i16>().collect();
            int_samples?
                .into_iter()
                .map(|s| s as f32 / 32768.0)
                .collect()
        }
        32 => {
            let float_samples: Result<Vec<f32>, _> = reader.samples::<f32>().collect();
            float_samples?
        }
        other => return Err(CliError::UnsupportedBitDepth(other).into()),
    };
    debug!("extracted {} samples", samples.len());

    // Virtual time comes from the consumed-sample position, so the decode
    // runs at the timing the recording carries, not at wall speed.
    let source = SliceSource::new(samples);
    let total = source.len();
    let position = source.position_handle();
    let clock = SampleClock::new(&source, spec.sample_rate as usize);

    let mut decoder = RttyDecoder::with_clock(source, clock);
    decoder.set_baud_rate(baud)?;
    decoder.set_window_size(window)?;
    decoder.set_threshold(threshold);
    decoder.set_debug_output(trace);
    decoder.init();

    let mut text = String::new();
    while position.get() < total {
        decoder.step();
        text.push_str(&decoder.drain_text(64));
    }
    text.push_str(&decoder.drain_text(64));

    println!("Decoded {} characters", text.chars().count());
    std::fs::write(output_path, &text)?;
    println!("Wrote {}", output_path.display());

    Ok(())
}
