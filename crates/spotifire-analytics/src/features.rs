//! Audio-feature profiles, distributions and means over a playlist.

use serde::Serialize;
use spotifire_common::{AudioFeatures, Result, SpotifireError, TrackRecord};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// One audio-feature attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFeature {
    /// How suitable a track is for dancing.
    Danceability,
    /// Perceived intensity.
    Energy,
    /// Presence of spoken words.
    Speechiness,
    /// Likelihood of no vocals.
    Instrumentalness,
    /// Presence of an audience.
    Liveness,
    /// Musical positiveness.
    Valence,
}

impl AudioFeature {
    /// Every feature, in chart order.
    pub const ALL: [Self; 6] = [
        Self::Danceability,
        Self::Energy,
        Self::Speechiness,
        Self::Instrumentalness,
        Self::Liveness,
        Self::Valence,
    ];

    /// Column name of the feature.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Danceability => "danceability",
            Self::Energy => "energy",
            Self::Speechiness => "speechiness",
            Self::Instrumentalness => "instrumentalness",
            Self::Liveness => "liveness",
            Self::Valence => "valence",
        }
    }

    /// Reads this feature from a feature vector.
    pub const fn value(self, features: &AudioFeatures) -> f64 {
        match self {
            Self::Danceability => features.danceability,
            Self::Energy => features.energy,
            Self::Speechiness => features.speechiness,
            Self::Instrumentalness => features.instrumentalness,
            Self::Liveness => features.liveness,
            Self::Valence => features.valence,
        }
    }
}

impl fmt::Display for AudioFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AudioFeature {
    type Err = SpotifireError;

    fn from_str(value: &str) -> Result<Self> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|feature| feature.name() == wanted)
            .ok_or_else(|| SpotifireError::new(format!("unknown audio feature '{value}'")))
    }
}

/// One `(track, feature, value)` row of a feature profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureValue {
    /// Track name.
    pub track: String,
    /// Feature.
    pub feature: AudioFeature,
    /// Feature value.
    pub value: f64,
}

/// Long-format feature rows for the selected tracks, in selection order.
#[instrument(skip(tracks, selection), fields(selected = selection.len()))]
pub fn feature_profile<S: AsRef<str>>(
    tracks: &[TrackRecord],
    selection: &[S],
) -> Result<Vec<FeatureValue>> {
    if selection.is_empty() {
        return Err(SpotifireError::empty_result("no tracks selected"));
    }

    let mut rows = Vec::with_capacity(selection.len() * AudioFeature::ALL.len());
    for name in selection {
        let name = name.as_ref();
        let track = tracks
            .iter()
            .find(|track| track.track_name == name)
            .ok_or_else(|| {
                SpotifireError::InvalidRecord {
                    message: format!("track '{name}' is not in the playlist"),
                    row: None,
                    field: Some("track_name".to_string()),
                }
            })?;

        rows.extend(AudioFeature::ALL.into_iter().map(|feature| FeatureValue {
            track: track.track_name.clone(),
            feature,
            value: feature.value(&track.features),
        }));
    }

    debug!("Built {} feature profile rows", rows.len());
    Ok(rows)
}

/// One histogram bin over `[lower, upper)`; the last bin also holds 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub lower: f64,
    /// Upper edge.
    pub upper: f64,
    /// Tracks in the bin.
    pub count: u32,
}

/// Distribution of one feature across a playlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureHistogram {
    /// Feature.
    pub feature: AudioFeature,
    /// Bins from 0 to 1.
    pub bins: Vec<HistogramBin>,
}

impl FeatureHistogram {
    /// Sum of all bin counts.
    pub fn total(&self) -> u32 {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bin_index(value: f64, bins: usize) -> usize {
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    ((clamped * bins as f64) as usize).min(bins - 1)
}

/// Upper bound on histogram bins.
pub const MAX_BINS: usize = 1000;

/// Fixed-width histograms over `[0, 1]` for every feature.
///
/// Values outside the range land in the edge bins. `bins` must lie in
/// `1..=MAX_BINS`.
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(tracks), fields(tracks = tracks.len()))]
pub fn feature_distribution(tracks: &[TrackRecord], bins: usize) -> Result<Vec<FeatureHistogram>> {
    if bins == 0 {
        return Err(SpotifireError::invalid_record(
            "histogram needs at least one bin",
        ));
    }
    if bins > MAX_BINS {
        return Err(SpotifireError::invalid_record(format!(
            "histogram supports at most {MAX_BINS} bins, got {bins}"
        )));
    }
    if tracks.is_empty() {
        return Err(SpotifireError::empty_result("playlist has no tracks"));
    }

    let width = 1.0 / bins as f64;
    let histograms: Vec<FeatureHistogram> = AudioFeature::ALL
        .into_iter()
        .map(|feature| {
            let mut counts = vec![0u32; bins];
            for track in tracks {
                counts[bin_index(feature.value(&track.features), bins)] += 1;
            }
            FeatureHistogram {
                feature,
                bins: counts
                    .into_iter()
                    .enumerate()
                    .map(|(index, count)| HistogramBin {
                        lower: index as f64 * width,
                        upper: (index + 1) as f64 * width,
                        count,
                    })
                    .collect(),
            }
        })
        .collect();

    debug!("Built {} feature histograms with {} bins", histograms.len(), bins);
    Ok(histograms)
}

/// Mean of one feature across a playlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMean {
    /// Feature.
    pub feature: AudioFeature,
    /// Arithmetic mean.
    pub mean: f64,
}

/// Mean value of every feature.
#[allow(clippy::cast_precision_loss)]
pub fn feature_means(tracks: &[TrackRecord]) -> Result<Vec<FeatureMean>> {
    if tracks.is_empty() {
        return Err(SpotifireError::empty_result("playlist has no tracks"));
    }

    let len = tracks.len() as f64;
    Ok(AudioFeature::ALL
        .into_iter()
        .map(|feature| FeatureMean {
            feature,
            mean: tracks
                .iter()
                .map(|track| feature.value(&track.features))
                .sum::<f64>()
                / len,
        })
        .collect())
}
