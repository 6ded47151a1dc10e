//! CSV source reader.
//!
//! Input is raw CSV text already read client-side. The first row is a
//! header naming at minimum `name` and `price`; `color`, `size`,
//! `image_url`, and `sku` are recognized when present. Rows missing a
//! name or carrying a non-numeric price are yielded as invalid
//! candidates (classified `failed` downstream) rather than aborting the
//! read. Re-reading the same text always yields the same sequence.

use outfred_core::candidate::CandidateProduct;

use crate::error::SourceError;

/// Column positions resolved from the header row.
#[derive(Debug)]
struct ColumnMap {
    name: usize,
    price: usize,
    color: Option<usize>,
    size: Option<usize>,
    image_url: Option<usize>,
    sku: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &::csv::StringRecord) -> Result<Self, SourceError> {
        let position = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };

        let name = position("name").ok_or_else(|| {
            SourceError::FormatInvalid("CSV header is missing required column 'name'".to_string())
        })?;
        let price = position("price").ok_or_else(|| {
            SourceError::FormatInvalid("CSV header is missing required column 'price'".to_string())
        })?;

        Ok(Self {
            name,
            price,
            color: position("color"),
            size: position("size"),
            image_url: position("image_url"),
            sku: position("sku"),
        })
    }
}

/// Decode CSV text into candidate products.
///
/// Fails only when the text has no usable header; individual bad rows
/// come back as candidates with a missing name or price.
pub fn read_candidates(text: &str) -> Result<Vec<CandidateProduct>, SourceError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SourceError::FormatInvalid(format!("unreadable CSV header: {e}")))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut candidates = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            // A row the CSV parser itself rejects still counts as one
            // failed candidate, preserving partial-failure semantics.
            Err(e) => {
                candidates.push(CandidateProduct::default());
                tracing::debug!(error = %e, "Skipping unparseable CSV row");
                continue;
            }
        };

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        candidates.push(candidate_from_record(&record, &columns));
    }

    Ok(candidates)
}

fn candidate_from_record(record: &::csv::StringRecord, columns: &ColumnMap) -> CandidateProduct {
    let field = |idx: usize| {
        record
            .get(idx)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    CandidateProduct {
        name: field(columns.name).unwrap_or_default(),
        price: field(columns.price).and_then(|raw| raw.parse::<f64>().ok()),
        color: columns.color.and_then(field),
        size: columns.size.and_then(field),
        image_url: columns.image_url.and_then(field),
        sku: columns.sku.and_then(field),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
