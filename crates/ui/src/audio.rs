use dioxus::document::eval;
use remote::AudioClip;
use services::{CueSink, PlaybackError};

/// Plays cues through the webview's `Audio` element.
///
/// Must be used from tasks spawned inside the Dioxus runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalCueSink;

impl CueSink for EvalCueSink {
    fn play(&self, clip: &AudioClip) -> Result<(), PlaybackError> {
        let script = cue_script(clip).map_err(|err| PlaybackError(err.to_string()))?;
        tracing::debug!(cue = %clip.name, bytes = clip.bytes.len(), "playing cue");
        // Fire and forget; the script reports its own failures to the console.
        let _ = eval(&script);
        Ok(())
    }
}

/// Script that stops any cue still playing and starts `clip`.
pub(crate) fn cue_script(clip: &AudioClip) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_string(&clip.bytes)?;
    let content_type = serde_json::to_string(&clip.content_type)?;
    Ok(format!(
        r#"(function() {{
  const previous = window.__alingoCue;
  if (previous) {{
    previous.audio.pause();
    URL.revokeObjectURL(previous.url);
  }}
  const blob = new Blob([new Uint8Array({bytes})], {{ type: {content_type} }});
  const url = URL.createObjectURL(blob);
  const audio = new Audio(url);
  window.__alingoCue = {{ audio, url }};
  audio.play().catch((err) => console.warn("cue playback failed", err));
}})();"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alingo_core::model::SoundName;

    #[test]
    fn script_embeds_bytes_and_type() {
        let clip = AudioClip {
            name: SoundName::new("la.mp3").unwrap(),
            content_type: "audio/mpeg".into(),
            bytes: vec![73, 68, 51],
        };
        let script = cue_script(&clip).unwrap();
        assert!(script.contains("new Uint8Array([73,68,51])"), "{script}");
        assert!(script.contains(r#"type: "audio/mpeg""#), "{script}");
        assert!(script.contains("previous.audio.pause()"));
    }

    #[test]
    fn content_type_is_escaped() {
        let clip = AudioClip {
            name: SoundName::new("x.mp3").unwrap(),
            content_type: "audio/\"mpeg".into(),
            bytes: Vec::new(),
        };
        let script = cue_script(&clip).unwrap();
        assert!(script.contains(r#""audio/\"mpeg""#), "{script}");
    }
}
