pub mod bonus;
pub mod entry;
pub mod round;
pub mod score;

/// Click-to-cycle step: unset starts at zero, `max` wraps back to zero.
pub(crate) const fn cycle_value(value: Option<u8>, max: u8) -> u8 {
    match value {
        None => 0,
        Some(current) if current >= max => 0,
        Some(current) => current + 1,
    }
}
