//! Aggregator trait definitions shared by every analysis.

use spotifire_common::Result;

/// A pure, stateless transformation from caller-owned records to a derived view.
pub trait Aggregator {
    /// The records this aggregator reads.
    type Input: ?Sized;

    /// The aggregate it produces.
    type Output;

    /// Aggregates the input. Calling twice on the same input yields equal output.
    fn aggregate(&self, input: &Self::Input) -> Result<Self::Output>;

    /// Gets the name of this aggregation.
    fn name(&self) -> &'static str;

    /// Gets the description of this aggregation.
    fn description(&self) -> &'static str;
}
