//! Transport mode of a network edge.

/// The line-string collection an edge was derived from.
///
/// Modes share one node space; a location observed in several collections
/// becomes a single junction node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransportMode {
    Road,
    Rail,
    Sea,
}

impl TransportMode {
    /// All modes, in the order their collections are conventionally loaded.
    pub const ALL: [TransportMode; 3] = [TransportMode::Road, TransportMode::Rail, TransportMode::Sea];

    /// Dense index for per-mode arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            TransportMode::Road => 0,
            TransportMode::Rail => 1,
            TransportMode::Sea  => 2,
        }
    }

    /// Human-readable label, useful for CSV column values and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Road => "road",
            TransportMode::Rail => "rail",
            TransportMode::Sea  => "sea",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
