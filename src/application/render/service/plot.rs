/// MIME marker for vega and vega-lite specifications.
pub const VEGA_MIME_MARKER: &str = "application/vnd.vega";

/// Decides which outputs are transparent vector-plot specifications that need a
/// forced white background to stay readable on dark hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotBackgroundPolicy {
    markers: Vec<String>,
}

impl PlotBackgroundPolicy {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    /// True when `mime_type` contains any configured marker.
    pub fn is_vector_plot(&self, mime_type: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| mime_type.contains(marker.as_str()))
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for PlotBackgroundPolicy {
    fn default() -> Self {
        Self::new([VEGA_MIME_MARKER])
    }
}
