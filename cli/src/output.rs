#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Indented property listing
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}
