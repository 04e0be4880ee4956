//! Price series loading for the runner.
//!
//! Resolves each allocated instrument to a forward-filled series using this
//! fallback policy:
//! 1. If the configured source has the instrument → use it
//! 2. If it does not and synthetic fallback is enabled → synthetic walk (tagged)
//! 3. Otherwise → fail with `DataUnavailable`
//!
//! Only "instrument not found" triggers the fallback. A source that has the
//! instrument but not the range is a real gap and stays fatal.

use std::collections::BTreeMap;

use lazyinvestor_core::data::{
    CsvPriceSource, DataError, DataSource, PriceSeries, PriceSource, SyntheticPriceSource,
};
use lazyinvestor_core::{SimulationConfig, SimulationError};

use crate::config::DataSettings;

/// Options controlling how series are loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Fall back to synthetic closes for instruments the source lacks.
    pub synthetic_fallback: bool,
}

/// Loaded series plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    /// One series per allocated instrument, in allocation order.
    pub series: Vec<PriceSeries>,
    /// Where each instrument's closes came from.
    pub sources: BTreeMap<String, DataSource>,
    /// BLAKE3 over every normalized close, in allocation order.
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

/// Build the price source described by `[data]` settings.
pub fn open_source(settings: &DataSettings) -> Box<dyn PriceSource> {
    match settings {
        DataSettings::Csv { dir } => Box::new(CsvPriceSource::new(dir.clone())),
        DataSettings::Synthetic => {
            tracing::warn!("using synthetic prices for every instrument; results are not real");
            Box::new(SyntheticPriceSource::new())
        }
    }
}

/// Load one series per allocated instrument of `config`.
pub fn load_series(
    config: &SimulationConfig,
    source: &dyn PriceSource,
    opts: &LoadOptions,
) -> Result<LoadedSeries, SimulationError> {
    let (start, end) = (config.start_date, config.end_date);
    let mut series = Vec::with_capacity(config.allocations.len());
    let mut sources = BTreeMap::new();
    let mut has_synthetic = source.kind() == DataSource::Synthetic;

    for instrument in config.instruments() {
        let (raw, kind) = match source.daily_closes(instrument, start, end) {
            Ok(raw) => (raw, source.kind()),
            Err(DataError::InstrumentNotFound { .. }) if opts.synthetic_fallback => {
                tracing::warn!(
                    instrument,
                    source = source.name(),
                    "instrument not in source, generating synthetic prices"
                );
                let raw = SyntheticPriceSource::new()
                    .daily_closes(instrument, start, end)
                    .map_err(|e| SimulationError::from_source(instrument, e))?;
                has_synthetic = true;
                (raw, DataSource::Synthetic)
            }
            Err(e) => return Err(SimulationError::from_source(instrument, e)),
        };

        let s = PriceSeries::forward_fill(instrument, &raw, start, end)?;
        tracing::debug!(
            instrument,
            source = ?kind,
            trading_days = raw.len(),
            filled_days = s.filled_days(),
            "loaded price series"
        );
        sources.insert(instrument.to_string(), kind);
        series.push(s);
    }

    let dataset_hash = compute_dataset_hash(&series);
    Ok(LoadedSeries {
        series,
        sources,
        dataset_hash,
        has_synthetic,
    })
}

fn compute_dataset_hash(series: &[PriceSeries]) -> String {
    let mut hasher = blake3::Hasher::new();
    for s in series {
        hasher.update(s.instrument().as_bytes());
        for (date, close) in s.iter() {
            hasher.update(date.to_string().as_bytes());
            hasher.update(&close.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
