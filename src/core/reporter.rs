use std::io::{self, Write};

/// Two decimals for finite prices; non-finite values print as `nan`, `inf`, `-inf`.
fn format_price(price: f64) -> String {
    match price {
        p if p.is_nan() => "nan".to_string(),
        p if p == f64::INFINITY => "inf".to_string(),
        p if p == f64::NEG_INFINITY => "-inf".to_string(),
        p => format!("{p:.2}"),
    }
}

/// Human-readable progress trace. Stdout in the binary, a buffer in tests.
pub struct Reporter<W> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn assets_file_missing(&mut self, path: &std::path::Path) -> io::Result<()> {
        self.line(format_args!("Assets file not found: {}", path.display()))
    }

    pub fn analyzing_asset(&mut self, asset: &str) -> io::Result<()> {
        self.line(format_args!("\nAnalyzing asset: {asset}"))
    }

    pub fn fetching_videos(&mut self, asset: &str) -> io::Result<()> {
        self.line(format_args!("Fetching top videos for '{asset}'..."))
    }

    pub fn no_videos(&mut self) -> io::Result<()> {
        self.line("No videos found.")
    }

    pub fn fetching_transcript(&mut self, video_id: &str) -> io::Result<()> {
        self.line(format_args!("Fetching transcript for video ID: {video_id}"))
    }

    pub fn transcript_error(&mut self, video_id: &str, reason: &str) -> io::Result<()> {
        self.line(format_args!(
            "Error fetching transcript for video {video_id}: {reason}"
        ))
    }

    pub fn no_transcripts(&mut self) -> io::Result<()> {
        self.line("No transcripts available for the videos.")
    }

    pub fn predicting(&mut self) -> io::Result<()> {
        self.line("\nPredicting stock price...")
    }

    pub fn no_valid_transcripts(&mut self) -> io::Result<()> {
        self.line("No valid transcripts found for prediction.")
    }

    pub fn prediction_error(&mut self, reason: impl std::fmt::Display) -> io::Result<()> {
        self.line(format_args!("Error predicting stock price: {reason}"))
    }

    pub fn predicted(&mut self, asset: &str, price: f64) -> io::Result<()> {
        self.line(format_args!(
            "Predicted Stock Price for '{asset}': {}",
            format_price(price)
        ))
    }

    pub fn prediction_failed(&mut self) -> io::Result<()> {
        self.line("Prediction failed.")
    }
}
