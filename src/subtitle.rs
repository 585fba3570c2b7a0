//! SRT rendering of transcription segments.

use crate::TranscriptionSegment;

/// Render segments as an SRT document: 1-based cue numbers, timestamps in
/// `HH:MM:SS,mmm` form, cues separated by blank lines.
pub fn to_srt(segments: &[TranscriptionSegment]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            segment.text.trim()
        ));
    }
    out
}

fn format_timestamp(seconds: f32) -> String {
    let total_ms = (seconds.max(0.0) as f64 * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let s = (total_ms / 1000) % 60;
    let m = (total_ms / 60_000) % 60;
    let h = total_ms / 3_600_000;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f32, end: f32, text: &str) -> TranscriptionSegment {
        TranscriptionSegment {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn timestamps_use_srt_form() {
        assert_eq!(format_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_timestamp(1.5), "00:00:01,500");
        assert_eq!(format_timestamp(61.25), "00:01:01,250");
        assert_eq!(format_timestamp(3661.007), "01:01:01,007");
    }

    #[test]
    fn negative_start_clamps_to_zero() {
        assert_eq!(format_timestamp(-0.5), "00:00:00,000");
    }

    #[test]
    fn cues_are_numbered_and_separated() {
        let srt = to_srt(&[
            segment(0.0, 1.5, " Guten Tag. "),
            segment(1.5, 3.0, "Wie geht es Ihnen?"),
        ]);

        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:01,500\nGuten Tag.\n\n\
             2\n00:00:01,500 --> 00:00:03,000\nWie geht es Ihnen?\n\n"
        );
    }

    #[test]
    fn empty_segments_render_empty_document() {
        assert_eq!(to_srt(&[]), "");
    }
}
