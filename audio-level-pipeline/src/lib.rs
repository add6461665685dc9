//! # audio-level-pipeline
//!
//! In-memory processor backend for audio-level-kit.
//!
//! Provides:
//! - `SoftwareProcessor`: `Processor` implementation driven by pushed buffers
//! - `SoftwareTrackControl`: `TrackControl` with a replaceable codec chain
//! - `ToneGenerator`: sine/silence PCM frames for demos and tests
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use audio_level_core::{AudioDevice, AudioDeviceSession, SessionConfiguration};
//! use audio_level_pipeline::{SoftwareProcessor, ToneGenerator};
//!
//! let mut tone = ToneGenerator::new(48000.0, 1, 440.0, 0.5);
//! let capture = Arc::new(SoftwareProcessor::from_formats("capture", [tone.format()]));
//! let session = AudioDeviceSession::new(AudioDevice::new("mic", "Mic"), SessionConfiguration::default());
//! session.set_local_user_audio_level_listener(Some(Arc::new(|level: i32| println!("{level}"))));
//! session.connect_capture(capture.clone())?;
//! session.start()?;
//! capture.process(0, tone.next_frame(20))?;
//! ```

pub mod software_processor;
pub mod software_track;
pub mod tone;

#[cfg(test)]
mod test_codecs;

pub use software_processor::SoftwareProcessor;
pub use software_track::SoftwareTrackControl;
pub use tone::ToneGenerator;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use audio_level_core::models::format::{MediaFormat, VideoFormat};
    use audio_level_core::{
        AudioDevice, AudioDeviceSession, Processor, ProcessorState, SessionConfiguration,
        SimpleAudioLevelListener, MAX_LEVEL,
    };

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<i32>>>, Arc<dyn SimpleAudioLevelListener>) {
        let levels = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&levels);
        let listener: Arc<dyn SimpleAudioLevelListener> =
            Arc::new(move |level: i32| sink.lock().push(level));
        (levels, listener)
    }

    fn video() -> MediaFormat {
        VideoFormat {
            encoding: "h264".into(),
            width: 1280,
            height: 720,
        }
        .into()
    }

    fn session() -> Arc<AudioDeviceSession> {
        AudioDeviceSession::new(
            AudioDevice::new("default", "Default Device"),
            SessionConfiguration::default(),
        )
    }

    fn started_capture(
        session: &AudioDeviceSession,
        formats: Vec<MediaFormat>,
    ) -> Arc<SoftwareProcessor> {
        let processor = Arc::new(SoftwareProcessor::from_formats("capture", formats));
        session.connect_capture(processor.clone()).unwrap();
        session.start().unwrap();
        processor
    }

    #[test]
    fn listener_before_configuration_receives_levels() {
        let mut tone = ToneGenerator::new(8000.0, 1, 440.0, 0.5);
        let session = session();
        let (levels, listener) = recorder();
        session.set_local_user_audio_level_listener(Some(listener));

        let capture = started_capture(&session, vec![tone.format()]);
        for _ in 0..5 {
            capture.process(0, tone.next_frame(20)).unwrap();
        }

        let levels = levels.lock();
        assert_eq!(levels.len(), 5);
        assert!(levels.iter().all(|&l| (117..=119).contains(&l)));
    }

    #[test]
    fn listener_after_configuration_receives_levels() {
        let mut tone = ToneGenerator::new(8000.0, 1, 440.0, 1.0);
        let session = session();
        let capture = started_capture(&session, vec![tone.format()]);
        capture.process(0, tone.next_frame(20)).unwrap();

        let (levels, listener) = recorder();
        session.set_local_user_audio_level_listener(Some(listener));
        capture.process(0, tone.next_frame(20)).unwrap();

        assert_eq!(levels.lock().len(), 1);
    }

    #[test]
    fn reregistering_replaces_listener() {
        let mut tone = ToneGenerator::new(8000.0, 1, 440.0, 0.5);
        let session = session();
        let (first, first_listener) = recorder();
        let (second, second_listener) = recorder();
        session.set_local_user_audio_level_listener(Some(first_listener));
        let capture = started_capture(&session, vec![tone.format()]);

        capture.process(0, tone.next_frame(20)).unwrap();
        session.set_local_user_audio_level_listener(Some(second_listener));
        capture.process(0, tone.next_frame(20)).unwrap();
        capture.process(0, tone.next_frame(20)).unwrap();

        assert_eq!(first.lock().len(), 1);
        assert_eq!(second.lock().len(), 2);
    }

    #[test]
    fn no_audio_track_installs_nothing() {
        let session = session();
        let capture = started_capture(&session, vec![video()]);

        assert_eq!(capture.state(), ProcessorState::Started);
        assert!(capture.track(0).unwrap().codec_chain().is_empty());
    }

    #[test]
    fn unsupported_plugins_do_not_abort_setup() {
        let tone = ToneGenerator::new(8000.0, 1, 440.0, 0.5);
        let session = session();
        let (levels, listener) = recorder();
        session.set_local_user_audio_level_listener(Some(listener));
        let processor = Arc::new(SoftwareProcessor::new(
            "capture",
            vec![SoftwareTrackControl::without_plugins(tone.format())],
        ));

        session.connect_capture(processor.clone()).unwrap();
        session.start().unwrap();
        processor
            .process(0, tone.clone().next_frame(20))
            .unwrap();

        assert_eq!(processor.state(), ProcessorState::Started);
        assert!(levels.lock().is_empty());
    }

    #[test]
    fn only_first_audio_track_decorated() {
        let tone = ToneGenerator::new(8000.0, 1, 440.0, 0.5);
        let session = session();
        let capture = started_capture(&session, vec![video(), tone.format(), tone.format()]);

        assert!(capture.track(0).unwrap().codec_chain().is_empty());
        assert_eq!(capture.track(1).unwrap().codec_chain().len(), 1);
        assert!(capture.track(2).unwrap().codec_chain().is_empty());
    }

    #[test]
    fn effect_is_pass_through() {
        let mut tone = ToneGenerator::new(8000.0, 1, 440.0, 0.7);
        let session = session();
        let (_, listener) = recorder();
        session.set_local_user_audio_level_listener(Some(listener));
        let capture = started_capture(&session, vec![tone.format()]);

        let input = tone.next_frame(20);
        let output = capture.process(0, input.clone()).unwrap();

        assert_eq!(output, input);
    }

    #[test]
    fn receive_stream_reports_to_stream_listener() {
        let mut tone = ToneGenerator::new(8000.0, 1, 440.0, 1.0);
        let session = session();
        let (local, local_listener) = recorder();
        let (stream, stream_listener) = recorder();
        session.set_local_user_audio_level_listener(Some(local_listener));
        session.set_stream_audio_level_listener(Some(stream_listener));

        let playback = Arc::new(SoftwareProcessor::from_formats("playback", [tone.format()]));
        session.add_receive_stream(0xdead_beef, playback.clone()).unwrap();
        assert_eq!(playback.state(), ProcessorState::Started);

        playback.process(0, tone.next_frame(20)).unwrap();

        assert!(local.lock().is_empty());
        assert_eq!(stream.lock().len(), 1);
        assert!(session.current_levels().stream.unwrap() >= MAX_LEVEL - 4);
    }

    #[test]
    fn silence_decays_gradually() {
        let mut tone = ToneGenerator::new(8000.0, 1, 440.0, 1.0);
        let session = session();
        let (levels, listener) = recorder();
        session.set_local_user_audio_level_listener(Some(listener));
        let capture = started_capture(&session, vec![tone.format()]);

        capture.process(0, tone.next_frame(20)).unwrap();
        for _ in 0..3 {
            capture.process(0, tone.silence(20)).unwrap();
        }

        let levels = levels.lock();
        for pair in levels.windows(2) {
            assert_eq!(pair[0] - pair[1], 8);
        }
    }

    #[test]
    fn chain_cannot_change_once_started() {
        let tone = ToneGenerator::new(8000.0, 1, 440.0, 0.5);
        let session = session();
        let capture = started_capture(&session, vec![tone.format()]);

        let tracks = capture.track_controls().unwrap();
        assert!(tracks[0].set_codec_chain(Vec::new()).is_err());
        assert_eq!(capture.track(0).unwrap().codec_chain().len(), 1);
    }
}
