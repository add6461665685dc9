use std::fmt;
use std::sync::Arc;

use crate::processing::level_effect::AudioLevelEffect;
use crate::traits::codec::Codec;
use crate::traits::processor::Processor;

/// Which side of a session a level effect measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectTarget {
    /// Audio captured from the local device.
    LocalCapture,
    /// Audio received from the remote party.
    ReceiveStream,
}

impl fmt::Display for EffectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalCapture => f.write_str("capture data source"),
            Self::ReceiveStream => f.write_str("receive stream processor"),
        }
    }
}

/// Install `effect` as the codec chain of the first audio track of `processor`.
///
/// Only the first audio track is decorated; later audio tracks are left
/// alone. The effect is installed whether or not it has a listener yet,
/// since the chain can only be set while the processor is configured.
///
/// Best effort: a processor without audio tracks, without track controls,
/// or refusing the plug-in is logged and otherwise ignored. Returns the
/// index of the decorated track.
pub fn install_level_effect(
    processor: &dyn Processor,
    effect: &Arc<AudioLevelEffect>,
    target: EffectTarget,
) -> Option<usize> {
    let tracks = match processor.track_controls() {
        Ok(tracks) => tracks,
        Err(e) => {
            log::error!("Track controls of the {} are not available: {}", target, e);
            return None;
        }
    };

    let Some((index, track)) = tracks
        .iter()
        .enumerate()
        .find(|(_, track)| track.format().is_audio())
    else {
        log::debug!("No audio track on the {}; level effect not installed", target);
        return None;
    };

    let chain: Vec<Arc<dyn Codec>> = vec![Arc::clone(effect) as Arc<dyn Codec>];
    match track.set_codec_chain(chain) {
        Ok(()) => {
            log::debug!("Installed level effect on track {} of the {}", index, target);
            Some(index)
        }
        Err(e) => {
            log::error!("Effects are not supported by the {}: {}", target, e);
            None
        }
    }
}
