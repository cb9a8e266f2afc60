//! Fixed parameters of the retrieval and evaluation pipeline.

use crate::model::Field;

/// Number of hits kept per query. Larger than the Cranfield collection, so every
/// matching document is returned.
pub const DEFAULT_TOP_N: usize = 1400;

/// BM25 term-frequency saturation.
pub const BM25_K1: f64 = 1.2;
/// BM25 length normalization strength.
pub const BM25_B: f64 = 0.75;

/// Lower bound applied to each average precision before taking the geometric mean.
/// Same value as trec_eval's `MIN_GEO_MEAN`.
pub const GM_MAP_FLOOR: f64 = 1e-5;

/// Cutoffs reported in a [`crate::eval::MetricReport`].
pub const PRECISION_CUTOFFS: [usize; 3] = [5, 10, 15];

/// Fields a free-text query is expanded over, in clause order.
pub const SEARCH_FIELDS: [Field; 4] = [Field::Text, Field::Title, Field::Author, Field::Journal];
