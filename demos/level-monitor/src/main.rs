use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use audio_level_core::{
    AudioDevice, AudioDeviceSession, SessionConfiguration, SimpleAudioLevelListener, MAX_LEVEL,
};
use audio_level_pipeline::{SoftwareProcessor, ToneGenerator};

/// Feed a fading tone through a capture processor and a steady tone through
/// a receive stream, printing the levels each side reports.
#[derive(Parser, Debug)]
#[command(name = "level-monitor")]
struct Args {
    /// Sample rate of the generated audio in Hz.
    #[arg(long, default_value_t = 48000.0)]
    sample_rate: f64,

    /// Tone frequency in Hz.
    #[arg(long, default_value_t = 440.0)]
    frequency: f64,

    /// Starting amplitude of the capture tone, relative to full scale.
    #[arg(long, default_value_t = 0.8)]
    amplitude: f64,

    /// Number of frames to push through each processor.
    #[arg(long, default_value_t = 25)]
    frames: u32,

    /// Frame duration in milliseconds.
    #[arg(long, default_value_t = 20)]
    frame_ms: u32,

    /// JSON session configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Prints a level as a bar meter.
struct MeterPrinter {
    label: &'static str,
}

impl SimpleAudioLevelListener for MeterPrinter {
    fn audio_level_changed(&self, level: i32) {
        let width = (level.max(0) as usize * 40) / MAX_LEVEL as usize;
        println!("{:>6} {:>3} |{:<40}|", self.label, level, "#".repeat(width));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SessionConfiguration::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SessionConfiguration::default(),
    };
    log::info!("Using configuration {:?}", config);

    let session = AudioDeviceSession::new(AudioDevice::system_default("tone", "Tone Generator"), config);
    log::info!("Monitoring {}", session.device());
    session.set_local_user_audio_level_listener(Some(Arc::new(MeterPrinter { label: "local" })));
    session.set_stream_audio_level_listener(Some(Arc::new(MeterPrinter { label: "remote" })));

    let mut local_tone = ToneGenerator::new(args.sample_rate, 1, args.frequency, args.amplitude);
    let mut remote_tone = ToneGenerator::new(args.sample_rate, 1, args.frequency * 1.5, 0.25);

    let capture = Arc::new(SoftwareProcessor::from_formats("capture", [local_tone.format()]));
    let playback = Arc::new(SoftwareProcessor::from_formats("playback", [remote_tone.format()]));

    session.connect_capture(capture.clone())?;
    session.add_receive_stream(1, playback.clone())?;
    session.start()?;

    for i in 0..args.frames {
        let fade = 1.0 - i as f64 / args.frames.max(1) as f64;
        local_tone.set_amplitude(args.amplitude * fade);
        capture.process(0, local_tone.next_frame(args.frame_ms))?;
        playback.process(0, remote_tone.next_frame(args.frame_ms))?;
    }

    let levels = session.current_levels();
    println!(
        "final levels: local={:?} remote={:?} ({} capture frames, {} playback frames)",
        levels.local,
        levels.stream,
        capture.frames_processed(),
        playback.frames_processed()
    );

    session.close();
    Ok(())
}
