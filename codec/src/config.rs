//! Decode configuration.

/// The number of nested message levels [Config::default] allows.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Limits applied while decoding untrusted input.
///
/// # Examples
///
/// ```
/// use protowire::Config;
///
/// let cfg = Config::new(8);
/// assert_eq!(cfg.max_depth, 8);
/// assert_eq!(Config::default().max_depth, protowire::config::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Config {
    /// The number of nested message levels below the top-level message.
    ///
    /// A message field beyond this depth fails with [crate::Error::RecursionLimit].
    pub max_depth: usize,
}

impl Config {
    /// Creates a configuration with the given depth limit.
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
