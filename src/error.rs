/// Errors surfaced by the synthesizer's fallible entry point.
///
/// Sample generation itself is total: a missing ROM, an out-of-range phone
/// code, or a ROM with no matching entry for a code are all handled by
/// falling back to silence rather than by returning an error here.
#[derive(thiserror::Error, Debug)]
pub enum RomError {
    #[error("ROM blob must be exactly 512 bytes, got {0}")]
    BadSize(usize),
}
