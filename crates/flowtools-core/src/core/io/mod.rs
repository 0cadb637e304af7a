//! Reading and writing of the plaintext files a simulation run produces.
//!
//! All map formats share one layout: a header line naming the data fields, whose
//! position in the header is their column, followed by one cell per line listed
//! column by column. The current format carries every field while the legacy
//! format split each frame into a density map and a sparse flow map. Spreading
//! collected from a run is stored in its own small format.

pub mod datamap;
pub mod legacy;
pub mod series;
pub mod spread;
pub(crate) mod table;
pub mod traits;

pub use table::{MapFormatError, ParseErrorKind};
