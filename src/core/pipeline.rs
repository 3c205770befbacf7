use crate::core::assets::load_assets;
use crate::core::predict::{Completer, Prediction, PredictionService};
use crate::core::reporter::Reporter;
use crate::core::search::{VideoSearch, find_captioned_videos};
use crate::core::transcript::{TranscriptOutcome, TranscriptSource, fetch_transcript_text};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Terminal state of one asset's run.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetOutcome {
    NoVideos,
    NoTranscripts,
    Predicted(f64),
    PredictionFailed,
}

pub struct Pipeline<S, T, C> {
    search: S,
    transcripts: T,
    predictor: PredictionService<C>,
    max_results: u32,
}

impl<S, T, C> Pipeline<S, T, C>
where
    S: VideoSearch,
    T: TranscriptSource,
    C: Completer,
{
    pub fn new(search: S, transcripts: T, completer: C, max_results: u32) -> Self {
        Self {
            search,
            transcripts,
            predictor: PredictionService::new(completer),
            max_results,
        }
    }

    /// Processes every asset listed in `assets_path`. A missing file is
    /// reported and ends the run without error.
    pub async fn run<W: Write>(
        &self,
        assets_path: &Path,
        reporter: &mut Reporter<W>,
    ) -> Result<()> {
        let assets = match load_assets(assets_path).await {
            Ok(assets) => assets,
            Err(Error::AssetsFileNotFound(path)) => {
                reporter.assets_file_missing(&path)?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        info!(count = assets.len(), path = %assets_path.display(), "loaded assets");

        self.analyze_all(&assets, reporter).await
    }

    pub async fn analyze_all<W: Write>(
        &self,
        assets: &[String],
        reporter: &mut Reporter<W>,
    ) -> Result<()> {
        for asset in assets {
            reporter.analyzing_asset(asset)?;
            let outcome = self.analyze_asset(asset, reporter).await?;
            info!(asset = %asset, ?outcome, "asset finished");
        }
        Ok(())
    }

    /// search -> caption filter -> transcripts -> prediction, for one asset.
    /// Only search failures escape as errors.
    pub async fn analyze_asset<W: Write>(
        &self,
        asset: &str,
        reporter: &mut Reporter<W>,
    ) -> Result<AssetOutcome> {
        reporter.fetching_videos(asset)?;
        let video_ids = find_captioned_videos(&self.search, asset, self.max_results).await?;

        if video_ids.is_empty() {
            reporter.no_videos()?;
            return Ok(AssetOutcome::NoVideos);
        }

        let mut transcripts = Vec::with_capacity(video_ids.len());
        for video_id in &video_ids {
            reporter.fetching_transcript(video_id)?;
            match fetch_transcript_text(&self.transcripts, video_id).await {
                TranscriptOutcome::Fetched(text) if !text.is_empty() => transcripts.push(text),
                TranscriptOutcome::Fetched(_) => {}
                TranscriptOutcome::Unavailable { reason } => {
                    reporter.transcript_error(video_id, &reason)?;
                }
            }
        }

        if transcripts.is_empty() {
            reporter.no_transcripts()?;
            return Ok(AssetOutcome::NoTranscripts);
        }

        reporter.predicting()?;
        match self.predictor.predict(&transcripts).await {
            Prediction::Price(price) => {
                reporter.predicted(asset, price)?;
                Ok(AssetOutcome::Predicted(price))
            }
            Prediction::NoTranscripts => {
                reporter.no_valid_transcripts()?;
                reporter.prediction_failed()?;
                Ok(AssetOutcome::NoTranscripts)
            }
            Prediction::Failed(failure) => {
                reporter.prediction_error(&failure)?;
                reporter.prediction_failed()?;
                Ok(AssetOutcome::PredictionFailed)
            }
        }
    }
}
