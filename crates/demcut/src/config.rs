//! Cut configuration.

/// Seconds per tick assumed when the source header does not record a
/// usable duration (66.67 Hz, the Source engine default).
pub const DEFAULT_TICK_INTERVAL: f32 = 0.015;

/// Options controlling how a cut is produced.
///
/// # Examples
///
/// ```
/// use demcut::CutOptions;
///
/// let options = CutOptions {
///     rebase_ticks: true,
///     ..CutOptions::default()
/// };
/// assert!(!options.strip_console_commands);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CutOptions {
    /// Shift emitted ticks so the window starts at tick 0. Default: false.
    pub rebase_ticks: bool,
    /// Drop console commands from the window. Default: false.
    pub strip_console_commands: bool,
}

impl Default for CutOptions {
    fn default() -> Self {
        Self {
            rebase_ticks: false,
            strip_console_commands: false,
        }
    }
}
