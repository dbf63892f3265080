use crate::document::Track;

/// Whether a track never raised its channel volume above zero.
///
/// Looks at the highest CC7 value the track ever sends, not the last one, so a
/// fade-out to silence does not count. A track without any volume events is
/// never muted.
pub fn is_muted(track: &Track) -> bool {
    track
        .volume_events()
        .map(|event| event.value.as_int())
        .max()
        .map_or(false, |loudest| loudest == 0)
}
