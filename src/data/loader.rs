//! Kline Loader Module
//! Loads the daily kline CSV export into a Polars DataFrame and answers
//! simple questions about it. One file holds the rows for many
//! securities; the query service filters per code.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Holds the loaded kline table. Expected columns: stock_code, date,
/// open, high, low, close, volume, amount.
pub struct KlineLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for KlineLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl KlineLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a kline CSV using Polars.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, LoaderError> {
        self.file_path = Some(PathBuf::from(file_path));

        // Lazy scan, then collect once
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        log::info!("loaded {} kline rows from {}", df.height(), file_path);
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Distinct security codes present in the loaded table, sorted.
    pub fn security_codes(&self) -> Vec<String> {
        self.df.as_ref().map(Self::codes_in).unwrap_or_default()
    }

    /// Distinct security codes in an arbitrary kline frame, sorted.
    pub fn codes_in(df: &DataFrame) -> Vec<String> {
        df.column("stock_code")
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                let mut codes: Vec<String> = (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                codes.sort();
                codes
            })
            .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    pub fn dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Install a DataFrame loaded elsewhere (background thread).
    pub fn set_dataframe(&mut self, df: DataFrame) {
        self.df = Some(df);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_csv_and_lists_codes() {
        let mut path = std::env::temp_dir();
        path.push("klineview_loader_test.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "stock_code,date,open,high,low,close,volume,amount").unwrap();
        writeln!(file, "000002.SZ,2022-01-04,20.0,21.0,19.0,20.5,2000,41000").unwrap();
        writeln!(file, "000001.SZ,2022-01-04,9.0,10.0,8.5,9.8,900,8820").unwrap();

        let mut loader = KlineLoader::new();
        loader.load_csv(path.to_str().unwrap()).unwrap();

        assert_eq!(loader.row_count(), 2);
        assert_eq!(loader.security_codes(), ["000001.SZ", "000002.SZ"]);
        assert!(loader.file_path().is_some());
        assert!(loader.dataframe().is_some());

        let _ = std::fs::remove_file(&path);
    }
}
