// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV as an alternative spreadsheet format, with delimiter and encoding
// detection on import.

mod csv_codec;

pub use csv_codec::CsvCodec;
