//! Beat/tick conversion for the editor's beat fields.

pub const TICKS_PER_BEAT: i32 = 480;

/// Beat shown for a tick position: six decimals cut, not rounded, to two.
///
/// `format_beat(720)` is `"1.50"`, `format_beat(479)` is `"0.99"`.
pub fn format_beat(ticks: i32) -> String {
    let full = format!("{:.6}", f64::from(ticks) / f64::from(TICKS_PER_BEAT));
    match full.find('.') {
        Some(dot) => full[..dot + 3].to_string(),
        None => full,
    }
}

pub fn ticks_to_beat(ticks: i32) -> f32 {
    ticks as f32 / TICKS_PER_BEAT as f32
}

/// Clamp `beat` into `[0, max_beat]` and round it to hundredths.
pub fn round_beat(beat: f32, max_beat: f32) -> f32 {
    (beat.clamp(0.0, max_beat.max(0.0)) * 100.0).round() / 100.0
}

/// Tick position for a typed beat, bounded by the loop length.
///
/// The beat is clamped to the loop and rounded to hundredths, then
/// converted with truncation. The conversion runs on whole hundredths so
/// values like `0.35` land on tick 168 exactly.
pub fn beat_input_to_ticks(beat: f32, tick_length: i32) -> i32 {
    let max_beat = f64::from(tick_length.max(0)) / f64::from(TICKS_PER_BEAT);
    let hundredths = (f64::from(beat).clamp(0.0, max_beat) * 100.0).round() as i64;
    (hundredths * i64::from(TICKS_PER_BEAT) / 100) as i32
}
