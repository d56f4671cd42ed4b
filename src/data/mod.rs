//! Input data model: substance profiles, doses, and the sampling grid

pub mod dose;
pub mod grid;
pub mod profile;

pub use dose::{Dose, ParameterOverrides};
pub use grid::{TimeGrid, HORIZON_MINUTES};
pub use profile::{Category, EffectScale, Formulation, SubstanceProfile};

use std::collections::HashMap;

/// Immutable substance lookup passed to each pipeline invocation
///
/// Keeping the lookup an explicit argument (rather than process-wide state)
/// keeps invocations reproducible and lets tests run in parallel.
pub type ProfileMap = HashMap<String, SubstanceProfile>;

/// Build a [`ProfileMap`] from a collection of profiles, keyed by name
pub fn profile_map<I>(profiles: I) -> ProfileMap
where
    I: IntoIterator<Item = SubstanceProfile>,
{
    profiles
        .into_iter()
        .map(|p| (p.name.clone(), p))
        .collect()
}
